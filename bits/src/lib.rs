//! The `bits` crate defines the fixed-width word values which are
//! useful in both the scheduling core and other associated tools.
//! The idea is that if you want to write, say, a waveform dumper, it
//! would depend on the bits crate but would not need to depend on the
//! scheduling library itself.

mod error;
mod word;

pub mod prelude;

pub use error::WordError;
pub use word::{Width, Word};

#[macro_export]
macro_rules! word {
    ($w:expr, $v:expr) => {
        $crate::prelude::Word::lit::<{ $w }, { $v }>()
    };
}

#[test]
fn test_word_macro() {
    use prelude::*;
    let m: Word = word!(4, 0b1010);
    let n: Word = Word::new(Width::new(4).expect("test width in range"), 0b1010)
        .expect("test value in range");
    assert_eq!(m, n);

    let p: Word = word!(64, u64::MAX);
    assert_eq!(p.value(), u64::MAX);

    let q: Word = word!(0, 0);
    assert_eq!(q, Word::EMPTY);
}
