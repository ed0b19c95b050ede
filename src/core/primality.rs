/// Trial-division primality test over every `i64`.
///
/// Odd divisors are tried up to `floor(sqrt(x)) + 1` (exclusive), which still
/// reaches the true root when the float square root truncates low.
pub fn is_prime(x: i64) -> bool {
    if x < 2 {
        return false;
    }
    if x == 2 {
        return true;
    }
    if x % 2 == 0 {
        return false;
    }

    let limit = (x as f64).sqrt() as i64 + 1;
    (3..limit).step_by(2).all(|d| x % d != 0)
}

/// 舊版示範輸出的句子
pub fn format_verdict(x: i64, prime: bool) -> String {
    if prime {
        format!("{} is a prime number.", x)
    } else {
        format!("{} is not a prime number.", x)
    }
}
