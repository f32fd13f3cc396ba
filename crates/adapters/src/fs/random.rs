use cbzz_application::RandomSource;
use rand::Rng;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 9;

#[derive(Debug, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn pick_index(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        rand::rng().random_range(0..upper)
    }

    fn token(&self) -> String {
        let mut rng = rand::rng();
        (0..TOKEN_LEN)
            .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
            .collect()
    }
}
