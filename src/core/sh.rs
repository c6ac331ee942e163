//! Real spherical harmonics basis functions.
//!
//! Coefficients for band `l` and index `m` ∈ [-l, l] are stored at
//! `l·(l+1) + m`, so an order-N expansion has (N+1)² entries:
//!
//! ```text
//! index:  0 | 1   2   3 | 4   5   6   7   8 | ...
//! (l,m): 00 | 1-1 10 11 | 2-2 2-1 20 21 22  | ...
//! ```
//!
//! Basis definition:
//! - m = 0: `K(l,0)·P(l,0,cosθ)`
//! - m > 0: `√2·K(l,m)·cos(mφ)·P(l,m,cosθ)`
//! - m < 0: `√2·K(l,|m|)·sin(|m|φ)·P(l,|m|,cosθ)`

use std::f64::consts::SQRT_2;

use super::math::{Real, FOUR_PI};

/// Storage index of coefficient (l, m).
pub fn sh_index(l: u32, m: i32) -> usize {
    let l = l as i64;
    (l * (l + 1) + m as i64) as usize
}

/// Number of coefficients of an order-`order` expansion.
pub fn coefficient_count(order: u32) -> usize {
    let n = order as usize + 1;
    n * n
}

/// Band and index stored at `index`.
pub fn sh_lm(index: usize) -> (u32, i32) {
    let l = (index as f64).sqrt().floor() as u32;
    let m = index as i64 - (l as i64) * (l as i64 + 1);
    (l, m as i32)
}

/// n! in floating point.
pub fn factorial(n: u32) -> Real {
    (2..=n).fold(1.0, |acc, k| acc * k as Real)
}

/// Associated Legendre polynomial P(l, m, x) for 0 ≤ m ≤ l, including the
/// Condon-Shortley phase.
pub fn legendre(l: u32, m: u32, x: Real) -> Real {
    // P(m, m) = (-1)^m (2m-1)!! (1-x²)^(m/2)
    let mut pmm = 1.0;
    if m > 0 {
        let somx2 = ((1.0 - x) * (1.0 + x)).sqrt();
        let mut odd = 1.0;
        for _ in 1..=m {
            pmm *= -odd * somx2;
            odd += 2.0;
        }
    }
    if l == m {
        return pmm;
    }

    let mut pmmp1 = x * (2 * m + 1) as Real * pmm;
    if l == m + 1 {
        return pmmp1;
    }

    let mut pll = 0.0;
    for ll in (m + 2)..=l {
        pll = ((2 * ll - 1) as Real * x * pmmp1 - (ll + m - 1) as Real * pmm) / (ll - m) as Real;
        pmm = pmmp1;
        pmmp1 = pll;
    }
    pll
}

/// Normalization constant K(l, m) for 0 ≤ m ≤ l.
pub fn normalization(l: u32, m: u32) -> Real {
    let numerator = (2 * l + 1) as Real * factorial(l - m);
    let denominator = FOUR_PI * factorial(l + m);
    (numerator / denominator).sqrt()
}

/// Value of the real SH basis function y(l, m) at (phi, theta).
///
/// Never returns NaN or infinity: non-finite intermediate results are
/// reported as 0.
pub fn sh_basis(l: u32, m: i32, phi: Real, theta: Real) -> Real {
    let cos_theta = theta.cos();
    let m_abs = m.unsigned_abs();
    if m_abs > l {
        return 0.0;
    }

    let value = if m == 0 {
        normalization(l, 0) * legendre(l, 0, cos_theta)
    } else if m > 0 {
        SQRT_2 * normalization(l, m_abs) * (m_abs as Real * phi).cos() * legendre(l, m_abs, cos_theta)
    } else {
        SQRT_2 * normalization(l, m_abs) * (m_abs as Real * phi).sin() * legendre(l, m_abs, cos_theta)
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}
