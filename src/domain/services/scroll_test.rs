use super::Scroll;

fn scroll(list_length: u16, viewport_length: u16) -> Scroll {
    let mut scroll = Scroll::default();
    scroll.set_state(list_length, viewport_length);
    return scroll;
}

#[test]
fn it_does_not_scroll_when_everything_fits() {
    let mut scroll = scroll(5, 20);
    scroll.down();
    scroll.down_page();
    scroll.last();

    assert_eq!(scroll.position, 0);
    assert!(scroll.is_at_bottom());
}

#[test]
fn it_clamps_to_the_last_line() {
    let mut scroll = scroll(30, 20);
    scroll.down_page();
    scroll.down_page();

    assert_eq!(scroll.position, 10);
    assert!(scroll.is_at_bottom());

    scroll.down();
    assert_eq!(scroll.position, 10);
}

#[test]
fn it_scrolls_up_to_the_top() {
    let mut scroll = scroll(100, 20);
    scroll.last();
    assert_eq!(scroll.position, 80);

    scroll.up();
    assert_eq!(scroll.position, 79);
    assert!(!scroll.is_at_bottom());

    scroll.up_page();
    assert_eq!(scroll.position, 69);

    for _ in 0..10 {
        scroll.up_page();
    }
    assert_eq!(scroll.position, 0);
}

#[test]
fn it_keeps_position_in_bounds_when_the_viewport_grows() {
    let mut scroll = scroll(100, 20);
    scroll.last();
    scroll.set_state(100, 90);

    assert_eq!(scroll.position, 10);
}
