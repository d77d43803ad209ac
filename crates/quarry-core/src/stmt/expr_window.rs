use super::{Expr, ExprFunc, OrderByExpr};

/// `func(..) OVER (PARTITION BY .. ORDER BY .. frame)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprWindow {
    pub func: ExprFunc,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub frame: Option<WindowFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,

    /// When `None`, the frame ends at the current row.
    pub end: Option<FrameBound>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnits {
    Rows,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

impl WindowFrame {
    pub fn rows(start: FrameBound, end: FrameBound) -> Self {
        Self {
            units: FrameUnits::Rows,
            start,
            end: Some(end),
        }
    }

    pub fn range(start: FrameBound, end: FrameBound) -> Self {
        Self {
            units: FrameUnits::Range,
            start,
            end: Some(end),
        }
    }

    /// `ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW`
    pub fn running() -> Self {
        Self::rows(FrameBound::UnboundedPreceding, FrameBound::CurrentRow)
    }
}

impl From<ExprWindow> for Expr {
    fn from(value: ExprWindow) -> Self {
        Self::Window(value)
    }
}
