//! Motivational quotes shown in human-readable status output.

use chrono::Utc;

pub const QUOTES: &[&str] = &[
    "“Opportunity is missed by most people because it is dressed in overalls and looks like work.”",
    "“I can do hard things.”",
    "“We've tried nothing, and we're all out of ideas.”",
    "“No shoulda, woulda, coulda.”",
    "“The best thesis is a done thesis.”",
];

/// Pick a quote deterministically from `seed`.
pub fn pick(seed: u64) -> &'static str {
    QUOTES[(seed % QUOTES.len() as u64) as usize]
}

/// Pick a quote seeded from the clock.
pub fn random() -> &'static str {
    pick(Utc::now().timestamp_subsec_nanos() as u64)
}
