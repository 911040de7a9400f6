// Optional, zero-cost-when-disabled instrumentation.
//
// `tracing` is an optional dependency (feature `tracing`); these macros
// expand to a real `tracing::debug!`/`tracing::trace!` call under the
// feature and to nothing at all otherwise, so call sites don't need their
// own `#[cfg(...)]` noise.

macro_rules! trace_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    };
}

macro_rules! trace_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    };
}

pub(crate) use trace_debug;
pub(crate) use trace_trace;
