//! `define_port_error!` generates port error enums with snake_case
//! constructors, so adapters write `UserPersistenceError::query(msg)` instead
//! of spelling out struct variants.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Connection { message: String } => "connection failed: {message}",
            Duplicate { email: String } => "duplicate: {email}",
            Limited { attempts: u32 } => "gave up after {attempts} attempts",
            Gone => "record gone",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = SamplePortError::limited(3_u32);
        assert_eq!(err, SamplePortError::Limited { attempts: 3 });
        assert_eq!(err.to_string(), "gave up after 3 attempts");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::gone().to_string(), "record gone");
        assert_eq!(
            SamplePortError::duplicate("a@example.com").to_string(),
            "duplicate: a@example.com"
        );
    }
}
