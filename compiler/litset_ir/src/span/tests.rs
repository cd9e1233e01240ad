use super::*;

#[test]
fn merge_covers_both_regardless_of_order() {
    let a = Span::new(20, 30);
    let b = Span::new(10, 25);
    assert_eq!(a.merge(b), Span::new(10, 30));
    assert_eq!(b.merge(a), Span::new(10, 30));
}

#[test]
fn contains_is_end_exclusive() {
    let span = Span::new(10, 20);
    assert!(span.contains(10));
    assert!(span.contains(19));
    assert!(!span.contains(20));
    assert!(!span.contains(9));
}

#[test]
fn try_from_range_rejects_oversized_offsets() {
    let big = u32::MAX as usize + 1;
    assert!(matches!(
        Span::try_from_range(big..big + 1),
        Err(SpanError::StartTooLarge(_))
    ));
    assert!(matches!(
        Span::try_from_range(0..big),
        Err(SpanError::EndTooLarge(_))
    ));
    assert_eq!(Span::try_from_range(3..9), Ok(Span::new(3, 9)));
}

#[test]
fn from_range_saturates() {
    let big = u32::MAX as usize + 10;
    assert_eq!(Span::from_range(5..big), Span::new(5, u32::MAX));
}

#[test]
fn offset_by_moves_nested_spans() {
    assert_eq!(Span::new(1, 4).offset_by(100), Span::new(101, 104));
}

#[test]
fn point_is_empty() {
    let p = Span::point(42);
    assert!(p.is_empty());
    assert_eq!(p.len(), 0);
    assert_eq!(format!("{p:?}"), "42..42");
}

#[test]
fn error_display_names_the_offending_bound() {
    let msg = SpanError::EndTooLarge(0x2_0000_0000).to_string();
    assert!(msg.contains("end"));
    assert!(msg.contains("0x200000000"));
}
