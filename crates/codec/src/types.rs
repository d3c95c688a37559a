//! Strongly typed operands that are not enumerations of the `spv` namespace.

use core::fmt;

/// A sequence of SPIR-V words.
pub type Blob = Vec<u32>;

macro_rules! word_types {
    ($($(#[$attr:meta])* $name:ident;)*) => {$(
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> u32 {
                value.0
            }
        }
    )*};
}

word_types! {
    /// A reference to an `<id>`.
    IdRef;
    /// The `<id>` defined by an instruction.
    IdResult;
    /// The `<id>` of the type of an instruction's result.
    IdResultType;
    /// An `<id>` of a memory-semantics constant.
    IdMemorySemantics;
    /// An `<id>` of a scope constant.
    IdScope;
    /// A 32-bit literal integer.
    LiteralInteger;
    /// A literal whose type is given by another operand; always one word here.
    LiteralContextDependentNumber;
    /// The instruction number of an extended instruction set.
    LiteralExtInstInteger;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PairLiteralIntegerIdRef {
    pub literal: LiteralInteger,
    pub id: IdRef,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PairIdRefLiteralInteger {
    pub id: IdRef,
    pub literal: LiteralInteger,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PairIdRefIdRef {
    pub id1: IdRef,
    pub id2: IdRef,
}

/// A literal string as it appears in an instruction: UTF-8 bytes, NUL
/// terminated and zero padded to a whole number of words.
///
/// This borrows the parsed words; nothing is copied.
#[derive(Clone, Copy, Default)]
pub struct LiteralStr<'a> {
    words: &'a [u32],
    len: usize,
}

impl<'a> LiteralStr<'a> {
    /// Finds the string at the start of `words`. Without a NUL byte, the
    /// string runs to the end of `words`.
    pub fn from_words(words: &'a [u32]) -> Self {
        let mut len = 0;
        'words: for word in words {
            for byte in word.to_le_bytes() {
                if byte == 0 {
                    break 'words;
                }
                len += 1;
            }
        }
        Self { words, len }
    }

    /// The length in bytes, without the terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The words the string, its terminator and padding occupy.
    pub fn words(&self) -> &'a [u32] {
        let count = (self.len / 4 + 1).min(self.words.len());
        &self.words[..count]
    }

    /// The bytes of the string, without the terminator.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + 'a {
        let words = self.words;
        words
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .take(self.len)
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes().collect::<Vec<_>>()).into_owned()
    }
}

impl PartialEq for LiteralStr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes().eq(other.bytes())
    }
}

impl Eq for LiteralStr<'_> {}

impl PartialEq<&str> for LiteralStr<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes().eq(other.bytes())
    }
}

impl fmt::Debug for LiteralStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl fmt::Display for LiteralStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}
