//! Energy payment matching
//!
//! The player pays for shop actions with an ordered queue of typed energy
//! tokens. A cost is a list of token types; paying picks one unused token per
//! requested type with a backtracking search that scans from the newest token
//! toward the oldest, so older tokens stay available for later demands.
//!
//! The search is exponential in the worst case. Queues and costs stay in the
//! low double digits in play, which keeps it cheap; do not feed it unbounded
//! input.

use serde::{Deserialize, Serialize};

/// Token type; tokens are fungible only within a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyType {
    White,
    Red,
    Green,
    Blue,
    Black,
}

/// Price of an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// That many tokens of the default (white) type
    Flat(u32),
    /// Explicit token types, matched in list order
    Tokens(Vec<EnergyType>),
}

impl Cost {
    /// Expand into the per-token request list
    pub fn requests(&self) -> Vec<EnergyType> {
        match self {
            Cost::Flat(amount) => vec![EnergyType::White; *amount as usize],
            Cost::Tokens(tokens) => tokens.clone(),
        }
    }
}

impl From<u32> for Cost {
    fn from(amount: u32) -> Self {
        Cost::Flat(amount)
    }
}

impl From<Vec<EnergyType>> for Cost {
    fn from(tokens: Vec<EnergyType>) -> Self {
        Cost::Tokens(tokens)
    }
}

/// Result of a payment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub success: bool,
    /// Remaining tokens on success, the untouched queue on failure
    pub queue: Vec<EnergyType>,
}

/// A queue token plus its claim flag for one matching attempt
struct Slot {
    kind: EnergyType,
    used: bool,
}

fn find_solution(request_idx: usize, slots: &mut [Slot], requests: &[EnergyType]) -> bool {
    let Some(&wanted) = requests.get(request_idx) else {
        return true;
    };

    for i in (0..slots.len()).rev() {
        if slots[i].used || slots[i].kind != wanted {
            continue;
        }
        slots[i].used = true;
        if find_solution(request_idx + 1, slots, requests) {
            return true;
        }
        slots[i].used = false;
    }

    false
}

/// Try to pay `cost` out of `queue`
///
/// On success the returned queue holds every unclaimed token in its original
/// order. On failure nothing is consumed.
pub fn try_pay(cost: &Cost, queue: &[EnergyType]) -> Payment {
    let requests = cost.requests();
    let mut slots: Vec<Slot> = queue
        .iter()
        .map(|&kind| Slot { kind, used: false })
        .collect();

    if find_solution(0, &mut slots, &requests) {
        Payment {
            success: true,
            queue: slots
                .into_iter()
                .filter(|s| !s.used)
                .map(|s| s.kind)
                .collect(),
        }
    } else {
        Payment {
            success: false,
            queue: queue.to_vec(),
        }
    }
}

/// Starting energy of a new run
pub const INITIAL_ENERGY: [EnergyType; 3] = [EnergyType::White; 3];

/// The player's ordered energy tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyQueue {
    tokens: Vec<EnergyType>,
}

impl EnergyQueue {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn from_tokens(tokens: Vec<EnergyType>) -> Self {
        Self { tokens }
    }

    /// Queue for a fresh run
    pub fn starting() -> Self {
        Self::from_tokens(INITIAL_ENERGY.to_vec())
    }

    pub fn tokens(&self) -> &[EnergyType] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append a token (newest last)
    pub fn push(&mut self, token: EnergyType) {
        self.tokens.push(token);
    }

    /// Append a batch of income in order
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = EnergyType>) {
        self.tokens.extend(tokens);
    }

    pub fn count(&self, kind: EnergyType) -> usize {
        self.tokens.iter().filter(|&&t| t == kind).count()
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        try_pay(cost, &self.tokens).success
    }

    /// Pay `cost`, consuming tokens only if the whole cost can be met
    pub fn pay(&mut self, cost: &Cost) -> bool {
        let payment = try_pay(cost, &self.tokens);
        if payment.success {
            self.tokens = payment.queue;
        } else {
            log::debug!("Cannot afford {:?} with {} tokens", cost, self.tokens.len());
        }
        payment.success
    }
}

#[cfg(test)]
mod tests {
    use super::EnergyType::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pay_two_white_leaves_red() {
        let payment = try_pay(&Cost::Tokens(vec![White, White]), &[White, Red, White]);
        assert!(payment.success);
        assert_eq!(payment.queue, vec![Red]);
    }

    #[test]
    fn test_missing_type_fails_untouched() {
        let payment = try_pay(&Cost::Tokens(vec![White, Red]), &[White]);
        assert!(!payment.success);
        assert_eq!(payment.queue, vec![White]);
    }

    #[test]
    fn test_prefers_newest_tokens() {
        // One white out of three: the last one is consumed
        let mut queue = EnergyQueue::from_tokens(vec![White, Red, White, Blue]);
        assert!(queue.pay(&Cost::Flat(1)));
        assert_eq!(queue.tokens(), &[White, Red, Blue]);
    }

    #[test]
    fn test_mixed_cost_consumes_everything() {
        let payment = try_pay(&Cost::Tokens(vec![Green, White, Green]), &[Green, White, Green]);
        assert!(payment.success);
        assert!(payment.queue.is_empty());
    }

    #[test]
    fn test_flat_cost_expands_to_white() {
        assert_eq!(Cost::Flat(3).requests(), vec![White, White, White]);
        assert_eq!(Cost::from(0u32).requests(), Vec::<EnergyType>::new());
        let payment = try_pay(&Cost::Flat(2), &[Red, White, Black]);
        assert!(!payment.success);
    }

    #[test]
    fn test_empty_cost_always_succeeds() {
        let payment = try_pay(&Cost::Tokens(vec![]), &[Red]);
        assert!(payment.success);
        assert_eq!(payment.queue, vec![Red]);
    }

    #[test]
    fn test_queue_pay_failure_keeps_tokens() {
        let mut queue = EnergyQueue::starting();
        assert!(!queue.pay(&Cost::Flat(4)));
        assert_eq!(queue.len(), 3);
        assert!(queue.can_afford(&Cost::Flat(3)));
        assert!(queue.pay(&Cost::Flat(3)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_extend_appends_in_order() {
        let mut queue = EnergyQueue::new();
        queue.push(Red);
        queue.extend([White, Black]);
        assert_eq!(queue.tokens(), &[Red, White, Black]);
        assert_eq!(queue.count(White), 1);
    }

    fn energy() -> impl Strategy<Value = EnergyType> {
        prop_oneof![Just(White), Just(Red), Just(Green), Just(Blue), Just(Black)]
    }

    fn count(tokens: &[EnergyType], kind: EnergyType) -> usize {
        tokens.iter().filter(|&&t| t == kind).count()
    }

    proptest! {
        #[test]
        fn prop_payment_matches_counts(
            queue in prop::collection::vec(energy(), 0..10),
            cost in prop::collection::vec(energy(), 0..6),
        ) {
            let payment = try_pay(&Cost::Tokens(cost.clone()), &queue);
            let affordable = [White, Red, Green, Blue, Black]
                .iter()
                .all(|&k| count(&cost, k) <= count(&queue, k));
            prop_assert_eq!(payment.success, affordable);

            if payment.success {
                prop_assert_eq!(payment.queue.len(), queue.len() - cost.len());
                // Residual keeps original relative order
                let mut rest = payment.queue.iter().peekable();
                for token in &queue {
                    if rest.peek() == Some(&token) {
                        rest.next();
                    }
                }
                prop_assert!(rest.next().is_none());
            } else {
                prop_assert_eq!(&payment.queue, &queue);
            }
        }
    }
}
