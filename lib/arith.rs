//! Small number-theoretic helpers for gate construction.

/// Return `true` if `n` is prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 { return false; }
    if n == 2 || n == 3 { return true; }
    if n % 2 == 0 { return false; }
    let mut k: usize = 3;
    while k * k <= n {
        if n % k == 0 { return false; }
        k += 2;
    }
    true
}

/// Reduce `a` modulo `m`, constrained to the range `0..m`.
///
/// *Panics if `m` is zero.*
pub fn rem_euclid(a: i128, m: usize) -> usize {
    a.rem_euclid(m as i128) as usize
}

/// Return `a * b` modulo `m`, for `a` and `b` already reduced modulo `m`.
///
/// *Panics if `m` is zero.*
pub fn mul_mod(a: usize, b: usize, m: usize) -> usize {
    ((a as u128 * b as u128) % m as u128) as usize
}

/// Return `a + b` modulo `m`, for `a` and `b` already reduced modulo `m`.
///
/// *Panics if `m` is zero.*
pub fn add_mod(a: usize, b: usize, m: usize) -> usize {
    ((a as u128 + b as u128) % m as u128) as usize
}

// via the extended Euclidean algorithm; returns (g, x) with a * x ≡ g (mod m)
fn ext_gcd(a: i128, m: i128) -> (i128, i128) {
    let (mut r0, mut r1) = (a, m);
    let (mut s0, mut s1) = (1_i128, 0_i128);
    while r1 != 0 {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (s0, s1) = (s1, s0 - q * s1);
    }
    (r0.abs(), s0 * r0.signum())
}

/// Return the inverse of `a` modulo `m` in the range `0..m`, if it exists.
///
/// The inverse exists iff `gcd(a, m) == 1` and `m > 1`.
pub fn mod_inverse(a: i128, m: usize) -> Option<usize> {
    if m < 2 { return None; }
    let a = rem_euclid(a, m) as i128;
    let (g, x) = ext_gcd(a, m as i128);
    (g == 1).then(|| rem_euclid(x, m))
}
