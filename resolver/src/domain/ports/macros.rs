//! `define_port_error!` declares the error enum of an outbound port.
//!
//! Each variant carries exactly one field and a display message. The macro
//! adds a snake_case constructor per variant taking `impl Into<FieldType>`,
//! so adapters can pass either an owned value or a `&str`:
//!
//! ```text
//! WeatherProviderError::timeout(err.to_string())
//! WeatherProviderError::status(503_u16)
//! ```

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $field:ident : $ty:ty } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    #[doc = concat!("Detail reported as `", stringify!($field), "`.")]
                    $field: $ty,
                },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    #[must_use]
                    pub fn [<$variant:snake>]($field: impl Into<$ty>) -> Self {
                        Self::$variant { $field: $field.into() }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;
