//! Bit manipulation primitives used by attack tables and move generation.
//!
//! Parallel bit extract/deposit use the BMI2 instructions when the crate is
//! compiled with that target feature enabled and fall back to a portable loop
//! otherwise. Both paths produce identical results, including for zero inputs.

/// A set of squares, one bit per square.
pub type Bitboard = u64;

pub const EMPTY: Bitboard = 0;
pub const ALL_SQUARES: Bitboard = !0;

/// Gather the bits of `value` selected by `mask` into the low bits of the
/// result, preserving their order (lowest mask bit lands in bit 0).
#[inline]
pub fn pext(value: u64, mask: u64) -> u64 {
    #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
    {
        // SAFETY: guarded by the `bmi2` target feature.
        unsafe { core::arch::x86_64::_pext_u64(value, mask) }
    }
    #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
    {
        pext_portable(value, mask)
    }
}

/// Scatter the low bits of `value` into the positions selected by `mask`.
#[inline]
pub fn pdep(value: u64, mask: u64) -> u64 {
    #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
    {
        // SAFETY: guarded by the `bmi2` target feature.
        unsafe { core::arch::x86_64::_pdep_u64(value, mask) }
    }
    #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
    {
        pdep_portable(value, mask)
    }
}

#[inline]
pub fn pext_portable(value: u64, mut mask: u64) -> u64 {
    let mut out = 0u64;
    let mut bit = 1u64;
    while mask != 0 {
        let lowest = mask & mask.wrapping_neg();
        if value & lowest != 0 {
            out |= bit;
        }
        bit <<= 1;
        mask &= mask - 1;
    }
    out
}

#[inline]
pub fn pdep_portable(value: u64, mut mask: u64) -> u64 {
    let mut out = 0u64;
    let mut bit = 1u64;
    while mask != 0 {
        let lowest = mask & mask.wrapping_neg();
        if value & bit != 0 {
            out |= lowest;
        }
        bit <<= 1;
        mask &= mask - 1;
    }
    out
}

/// Index of the least significant set bit. Returns 64 for an empty board,
/// matching `tzcnt`.
#[inline]
pub const fn lsb(bb: Bitboard) -> u8 {
    bb.trailing_zeros() as u8
}

/// Remove and return the least significant square of a non-empty board.
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> u8 {
    let sq = lsb(*bb);
    *bb &= bb.wrapping_sub(1);
    sq
}

#[inline]
pub const fn popcount(bb: Bitboard) -> u32 {
    bb.count_ones()
}

#[inline]
pub const fn more_than_one(bb: Bitboard) -> bool {
    bb & bb.wrapping_sub(1) != 0
}

#[inline]
pub const fn square_bb(square: u8) -> Bitboard {
    1u64 << square
}

/// Iterator over the squares of a bitboard, lowest first.
#[derive(Debug, Clone, Copy)]
pub struct Squares(pub Bitboard);

impl Iterator for Squares {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(pop_lsb(&mut self.0))
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = popcount(self.0) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Squares {}
