use crate::domain::errors::FetchResult;
use crate::domain::market_data::{Candle, SourceId, TailSize};

/// Port for retrieving candle windows from the dashboard backend.
///
/// Futures are not `Send`: everything runs on the page's single thread.
#[allow(async_fn_in_trait)]
pub trait CandleSource {
    /// Ordered tail window, at most `tail` rows, fewer if the source is shorter
    async fn fetch_tail(&self, source: &SourceId, tail: TailSize) -> FetchResult<Vec<Candle>>;

    /// Selectable data sources
    async fn list_sources(&self) -> FetchResult<Vec<SourceId>>;
}

/// First analysed file if any, else the first source
pub fn default_source(sources: &[SourceId]) -> Option<SourceId> {
    sources
        .iter()
        .find(|s| s.is_analysed())
        .or_else(|| sources.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_analysed_sources() {
        let sources = vec![SourceId::from("a.csv"), SourceId::from("b_anal.csv")];
        assert_eq!(default_source(&sources), Some(SourceId::from("b_anal.csv")));
        assert_eq!(default_source(&sources[..1]), Some(SourceId::from("a.csv")));
        assert_eq!(default_source(&[]), None);
    }
}
