use cosmwasm_schema::cw_serde;

/// How an envelope's pool is divided among its claim slots.
#[cw_serde]
pub enum SplitPolicy {
    /// Every claim gets `remaining / slots_left`; the last slot takes the truncation dust.
    Even,
    /// Every claim draws a bounded pseudo-random share from a per-claim entropy seed.
    Random,
}

impl SplitPolicy {
    pub fn from_is_random(is_random: bool) -> Self {
        if is_random {
            SplitPolicy::Random
        } else {
            SplitPolicy::Even
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self, SplitPolicy::Random)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitPolicy::Even => "even",
            SplitPolicy::Random => "random",
        }
    }
}
