//! Typed domain separators for canonical hashing.
//!
//! Every hash computation in the workspace MUST select a domain via
//! [`HashDomain`]. Adding a new domain is a single change here: the enum,
//! `as_bytes()`, `ALL`, and `Display` are all generated from the same macro
//! invocation.

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        ///
        /// Every variant maps to a unique, null-terminated byte string used as
        /// a SHA-256 prefix.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    // -----------------------------------------------------------------------
    // Kernel
    // -----------------------------------------------------------------------

    /// Target table commitment (`x`, `y`, `mass` bit patterns in id order).
    TargetSet => b"SWEEPROUTE::TARGET_SET::V1\0",

    /// Visiting order commitment.
    Route => b"SWEEPROUTE::ROUTE::V1\0",

    // -----------------------------------------------------------------------
    // Harness
    // -----------------------------------------------------------------------

    /// Per-worker seed derivation for the ensemble runner.
    WorkerSeed => b"SWEEPROUTE::WORKER_SEED::V1\0",

    /// Run report content hashing.
    RunReport => b"SWEEPROUTE::RUN_REPORT::V1\0",
}
