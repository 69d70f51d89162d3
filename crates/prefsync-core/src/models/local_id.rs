//! Client-generated identifiers for preferences queued while offline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Prefix marking an id that was minted on the client.
pub const LOCAL_ID_PREFIX: &str = "local-";

const LOCAL_ID_SUFFIX_LEN: usize = 7;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
/// 36^7, the number of distinct suffixes.
const ID_SPACE: u64 = 78_364_164_096;
/// Odd and not a multiple of 3, so it is coprime with 36^7 and the walk
/// visits every suffix once before repeating.
const ID_STRIDE: u64 = 40_507_891_789;

static ID_SEED: OnceLock<u64> = OnceLock::new();
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new `local-xxxxxxx` id.
///
/// The suffix starts at a random point in the base36 space and walks it with
/// a fixed stride, so ids look random but never repeat within a process.
pub fn generate_local_id() -> String {
    let seed = *ID_SEED.get_or_init(|| fastrand::u64(..ID_SPACE));
    let step = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let offset = (u128::from(step) * u128::from(ID_STRIDE)) % u128::from(ID_SPACE);
    let value = (u128::from(seed) + offset) % u128::from(ID_SPACE);
    // value < ID_SPACE, which fits in u64
    let value = u64::try_from(value).unwrap_or_default();

    format!("{LOCAL_ID_PREFIX}{}", encode_base36(value))
}

/// Returns true when `id` has the shape of a client-generated id.
pub fn is_local_id(id: &str) -> bool {
    id.strip_prefix(LOCAL_ID_PREFIX).is_some_and(|suffix| {
        suffix.len() == LOCAL_ID_SUFFIX_LEN
            && suffix
                .bytes()
                .all(|byte| byte.is_ascii_digit() || byte.is_ascii_lowercase())
    })
}

fn encode_base36(mut value: u64) -> String {
    let mut digits = [b'0'; LOCAL_ID_SUFFIX_LEN];
    for slot in digits.iter_mut().rev() {
        // value % 36 < 36
        *slot = BASE36_DIGITS[(value % 36) as usize];
        value /= 36;
    }
    digits.iter().map(|&byte| char::from(byte)).collect()
}
