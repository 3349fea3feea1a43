//! Burn backend chosen at compile time.
//!
//! `ndarray` is the default. The `wgpu` and `cuda` features swap in a GPU
//! backend; everything else in the crate stays generic over the backend and
//! only the entry points name the concrete type.

use core::fmt;

use serde::Serialize;

use self::burn_backend_types::{EvalDevice, NAME};

pub mod burn_backend_types {
    use burn::tensor::backend::Backend;
    use cfg_if::cfg_if;

    cfg_if! {
        if #[cfg(feature = "cuda")] {
            pub type EvalBackend = burn::backend::cuda::Cuda;
            pub const NAME: &str = "cuda";
        } else if #[cfg(feature = "wgpu")] {
            pub type EvalBackend = burn::backend::wgpu::Wgpu;
            pub const NAME: &str = "wgpu";
        } else {
            pub type EvalBackend = burn::backend::ndarray::NdArray;
            pub const NAME: &str = "ndarray";
        }
    }

    pub type EvalDevice = <EvalBackend as Backend>::Device;
}

/// Which backend and device an evaluation runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendSummary {
    pub backend: &'static str,
    pub device: String,
}

impl BackendSummary {
    pub fn new(device: &EvalDevice) -> Self {
        Self {
            backend: NAME,
            device: format!("{device:?}"),
        }
    }
}

impl fmt::Display for BackendSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.backend, self.device)
    }
}

#[cfg(all(test, not(any(feature = "cuda", feature = "wgpu"))))]
mod tests {
    use super::*;

    #[test]
    fn default_build_runs_on_the_cpu() {
        let summary = BackendSummary::new(&EvalDevice::default());

        assert_eq!(summary.backend, "ndarray");
        assert!(summary.to_string().starts_with("ndarray ("));
        assert!(!summary.device.is_empty());
    }
}
