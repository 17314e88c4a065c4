//! Per-source EAX occlusion/obstruction/exclusion commit (§4.6 "Per-source
//! (EAX 2/3) occlusion/obstruction/exclusion"): bridges this buffer's
//! [`SourceFilter`] record to its borrowed source's direct/send low-pass
//! filters and wet-path send.

use crate::{
    backend::effect::AuxSlotId,
    eax::source_filter::{SourceFilter, APPLY_BOTH},
    Result,
};

use super::Secondary;

impl Secondary {
    pub fn eax_filter(&self) -> SourceFilter {
        self.state.lock().filter
    }

    /// Update the occlusion/obstruction/exclusion record and push it to the
    /// backend immediately; `aux_slot` is the primary's slot-0 auxiliary
    /// slot and send index for EAX2/3 routing (`None` when EFX or the
    /// primary's FX slot is unavailable).
    pub fn set_eax_filter(&self, filter: SourceFilter, aux_slot: Option<(AuxSlotId, i32)>) -> Result {
        self.state.lock().filter = filter;
        self.commit_eax_filter(aux_slot)
    }

    pub(crate) fn commit_eax_filter(&self, aux_slot: Option<(AuxSlotId, i32)>) -> Result {
        let (source, filter, direct_filter, send_filter) = {
            let state = self.state.lock();
            (state.source, state.filter, state.direct_filter, state.send_filter)
        };
        let (Some(source), Some(direct_filter), Some(send_filter)) = (source, direct_filter, send_filter)
        else {
            return Ok(());
        };

        let _guard = self.share().lock_context()?;
        filter.apply(source, direct_filter, send_filter, aux_slot, APPLY_BOTH)
    }
}
