use crate::authorize::error::GateError;
use crate::context::ExecutionContext;

/// Checks that the action may run here. Reads the snapshot only.
pub fn check_preconditions(ctx: &ExecutionContext) -> Result<(), GateError> {
    if !ctx.is_leader {
        return Err(GateError::NotLeader);
    }
    if !ctx.ca_available {
        return Err(GateError::CaUnavailable);
    }
    if ctx.api_address.is_none() {
        return Err(GateError::ApiAddressUnavailable);
    }
    Ok(())
}
