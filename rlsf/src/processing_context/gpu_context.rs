use std::any::{Any, TypeId, type_name};

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::prelude::*;

/// Compute pipeline that a [`GpuContext`] can build once and hand out by type.
pub trait GpuPipeline: Any + std::fmt::Debug + Send + Sync {}

/// A GPU plus the compute pipelines built on it, one per pipeline type.
///
/// Pipelines are compiled on first request, so operations that never run on
/// the GPU cost nothing.
#[derive(Debug)]
pub struct GpuContext {
    gpu: Gpu,
    pipelines: HashMap<TypeId, Box<dyn GpuPipeline>>,
}

impl GpuContext {
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            pipelines: HashMap::new(),
        }
    }

    /// Returns the cached pipeline of type `T`, building it with `create` on first use.
    ///
    /// A failed `create` leaves the cache untouched, so the next call retries.
    pub fn get_or_create<T, F>(&mut self, create: F) -> Result<&T>
    where
        T: GpuPipeline,
        F: FnOnce(&Gpu) -> Result<T>,
    {
        let pipeline = match self.pipelines.entry(TypeId::of::<T>()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let pipeline: Box<dyn GpuPipeline> = Box::new(create(&self.gpu)?);
                tracing::debug!(
                    pipeline = type_name::<T>(),
                    adapter = self.gpu.adapter_name(),
                    "compute pipeline created"
                );
                entry.insert(pipeline)
            }
        };

        (&**pipeline as &dyn Any).downcast_ref::<T>().ok_or_else(|| {
            Error::Gpu(format!(
                "pipeline cached as the wrong type: {}",
                type_name::<T>()
            ))
        })
    }

    /// Number of pipelines built so far.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }
}
