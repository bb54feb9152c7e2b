mod backend_selection;
mod rlsf;

pub use backend_selection::{Backend, BackendPreference, select_backend};
pub use rlsf::{GpuRlsfPipeline, MAX_ALPHA, Rlsf, RlsfKernelParams, filter_ms_rlsf};
