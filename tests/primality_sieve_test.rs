use prime_pool::is_prime;

fn sieve(limit: usize) -> Vec<bool> {
    let mut composite = vec![false; limit + 1];
    let mut primes = vec![false; limit + 1];
    for n in 2..=limit {
        if composite[n] {
            continue;
        }
        primes[n] = true;
        let mut multiple = n * n;
        while multiple <= limit {
            composite[multiple] = true;
            multiple += n;
        }
    }
    primes
}

#[test]
fn test_matches_sieve_up_to_one_million() {
    let limit = 1_000_000;
    let reference = sieve(limit);

    for x in 3..=limit {
        assert_eq!(is_prime(x as i64), reference[x], "mismatch at {}", x);
    }
}

#[test]
fn test_non_positive_and_even_inputs() {
    for x in -1_000..2 {
        assert!(!is_prime(x));
    }
    assert!(is_prime(2));
    for x in (4..10_000).step_by(2) {
        assert!(!is_prime(x));
    }
}
