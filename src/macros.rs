/// Declares a fieldless `#[repr(u8)]` enum whose variants map one-to-one onto
/// protocol byte values, along with conversions to and from `u8`.
#[macro_export]
macro_rules! c_like_enum {
    (
        $(#[$attr: meta])*
        $name: ident {
            $($(#[$vattr: meta])* $variant: ident = $value: literal,)*
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vattr])* $variant = $value,)+
        }

        impl $name {
            pub fn from_u8(value: u8) -> Option<$name> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None
                }
            }

            pub fn code(self) -> u8 {
                self as u8
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }
    };
}
