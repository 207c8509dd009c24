pub mod playbill_ctx;
pub mod playbill_flow;

pub use playbill_ctx::PlaybillCtx;
pub use playbill_flow::{PlaybillFlow, PlaybillOutcome};
