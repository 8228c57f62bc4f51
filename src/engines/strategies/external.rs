use super::{random_candidate, Strategy, StrategyId};
use crate::error::Result;
use crate::types::{clamp_size, Candidate, HistoryWindow};
use futures::executor::block_on;
use futures::future::BoxFuture;
use log::warn;
use rand::RngCore;

/// Candidate source that lives outside the engine, e.g. a neural model served
/// by another runtime.
pub trait AsyncStrategyProvider: Send + Sync {
    fn id(&self) -> StrategyId {
        StrategyId::Neural
    }

    fn generate<'a>(&'a self, history: HistoryWindow<'a>, size: usize) -> BoxFuture<'a, Result<Candidate>>;
}

/// Drives an async provider to completion so it can sit in the registry and
/// the backtest next to the built-in strategies.
pub struct BlockingStrategy<P> {
    provider: P,
}

impl<P: AsyncStrategyProvider> BlockingStrategy<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: AsyncStrategyProvider> Strategy for BlockingStrategy<P> {
    fn id(&self) -> StrategyId {
        self.provider.id()
    }

    fn generate(&self, history: HistoryWindow<'_>, size: usize, rng: &mut dyn RngCore) -> Candidate {
        let size = clamp_size(size);
        match block_on(self.provider.generate(history, size)) {
            Ok(candidate) if candidate.len() == size => candidate,
            Ok(candidate) => {
                warn!(
                    "{} provider returned {} numbers, expected {}; using random fallback",
                    self.id(),
                    candidate.len(),
                    size
                );
                random_candidate(size, rng)
            }
            Err(e) => {
                warn!("{} provider failed: {}; using random fallback", self.id(), e);
                random_candidate(size, rng)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrawbiasError;
    use crate::types::History;
    use futures::future::FutureExt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Echo;

    impl AsyncStrategyProvider for Echo {
        fn generate<'a>(&'a self, _history: HistoryWindow<'a>, size: usize) -> BoxFuture<'a, Result<Candidate>> {
            async move {
                let numbers: Vec<u8> = (1..=size as u8).collect();
                Candidate::new(&numbers)
            }
            .boxed()
        }
    }

    struct Offline;

    impl AsyncStrategyProvider for Offline {
        fn generate<'a>(&'a self, _history: HistoryWindow<'a>, _size: usize) -> BoxFuture<'a, Result<Candidate>> {
            futures::future::ready(Err(DrawbiasError::Strategy("model server unreachable".to_string()))).boxed()
        }
    }

    #[test]
    fn test_provider_result_is_used() {
        let strategy = BlockingStrategy::new(Echo);
        let history = History::default();
        let candidate = strategy.generate(history.window(), 16, &mut StdRng::seed_from_u64(0));
        assert_eq!(candidate.numbers(), (1..=16).collect::<Vec<u8>>().as_slice());
        assert_eq!(strategy.id(), StrategyId::Neural);
    }

    #[test]
    fn test_failure_falls_back() {
        let strategy = BlockingStrategy::new(Offline);
        let history = History::default();
        let candidate = strategy.generate(history.window(), 15, &mut StdRng::seed_from_u64(0));
        assert_eq!(candidate.len(), 15);
    }
}
