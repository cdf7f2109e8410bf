//! Snippet Views
//!
//! The snippet keeps no server-side session: every request names the view to
//! render through its `componentId`, and each view renders a complete block
//! list from scratch. Rendering is pure; side effects happen in the handler.

use super::types::{Block, ButtonStyle, SnippetUser};
use crate::hooks::Order;

/// Button: open the order history.
pub const VIEW_ORDERS: &str = "view-orders";
/// Button: issue a coupon.
pub const ISSUE_COUPON: &str = "issue-coupon";
/// Button: save the memo form.
pub const SAVE_MEMO: &str = "save-memo";
/// Button: return to the main view.
pub const BACK_TO_MAIN: &str = "back-to-main";
/// Form field holding the memo text.
pub const MEMO_INPUT: &str = "memo-input";

/// Shown when a memo is saved blank.
pub const EMPTY_MEMO: &str = "(빈 메모)";

/// The view a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Main,
    ViewOrders,
    IssueCoupon,
    SaveMemo,
}

impl View {
    /// Resolve the view from the triggering component.
    ///
    /// No component means first render. Unknown components fall back to
    /// `Main`, as does `back-to-main`.
    pub fn from_component_id(component_id: Option<&str>) -> Self {
        match component_id {
            Some(VIEW_ORDERS) => Self::ViewOrders,
            Some(ISSUE_COUPON) => Self::IssueCoupon,
            Some(SAVE_MEMO) => Self::SaveMemo,
            Some(_) | None => Self::Main,
        }
    }
}

fn back_button() -> Block {
    Block::button(BACK_TO_MAIN, "← 돌아가기", ButtonStyle::Default)
}

/// Customer overview with actions and the memo form.
pub fn main_view(user: &SnippetUser) -> Vec<Block> {
    vec![
        Block::heading(format!("{}님 정보", user.name().unwrap_or("고객"))),
        Block::Divider,
        Block::label("고객 ID", &user.id),
        Block::label("이메일", user.email().unwrap_or("-")),
        Block::label("전화번호", user.mobile_number().unwrap_or("-")),
        Block::Divider,
        Block::button(VIEW_ORDERS, "주문 내역 조회", ButtonStyle::Primary),
        Block::button(ISSUE_COUPON, "쿠폰 발급", ButtonStyle::Default),
        Block::Divider,
        Block::bold("메모", None),
        Block::text_input(MEMO_INPUT, Some("고객 메모 입력...")),
        Block::button(SAVE_MEMO, "메모 저장", ButtonStyle::Default),
    ]
}

/// Order history, one label pair and divider per order, in the given order.
pub fn orders_view(orders: &[Order]) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(orders.len() * 3 + 3);
    blocks.push(Block::heading("주문 내역"));
    blocks.push(Block::Divider);
    for order in orders {
        blocks.push(Block::label(&order.id, &order.product));
        blocks.push(Block::label(
            "상태",
            format!("{} ({})", order.status, order.date),
        ));
        blocks.push(Block::Divider);
    }
    blocks.push(back_button());
    blocks
}

/// Confirmation for a freshly issued coupon.
pub fn coupon_view(code: &str) -> Vec<Block> {
    vec![
        Block::heading("쿠폰 발급 완료!"),
        Block::Divider,
        Block::label("쿠폰 코드", code),
        Block::label("할인", "10% 할인"),
        Block::label("유효기간", "발급일로부터 30일"),
        Block::Divider,
        back_button(),
    ]
}

/// Confirmation echoing the saved memo.
pub fn memo_saved_view(memo: &str) -> Vec<Block> {
    let shown = if memo.trim().is_empty() { EMPTY_MEMO } else { memo };
    vec![
        Block::bold("메모가 저장되었습니다.", None),
        Block::label("내용", shown),
        Block::Divider,
        back_button(),
    ]
}
