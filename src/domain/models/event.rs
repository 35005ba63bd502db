use tui_textarea::Input;

use super::ChatReply;
use super::SessionStart;

pub enum Event {
    BackendReply(u64, ChatReply),
    BackendReplyFailed(u64),
    BackendSessionStarted(SessionStart),
    BackendSessionFailed(),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardPaste(String),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
