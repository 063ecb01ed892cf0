use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const AFFIRMATIONS: &[&str] = &[
    "I show up, even when it's hard.",
    "Small consistent steps create massive results.",
    "Focus. Finish. Flourish.",
    "My effort today is an investment in who I am becoming.",
    "I can do hard things, one step at a time.",
    "Progress, not perfection.",
    "I choose growth over comfort.",
];

/// Affirmation of the day: stable for a given user and date.
pub fn affirmation_for(user_id: Uuid, date: NaiveDate) -> &'static str {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(date.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    let index = u64::from_be_bytes(seed) % AFFIRMATIONS.len() as u64;
    AFFIRMATIONS[index as usize]
}
