use sighting_globe::config::AppConfig;
use sighting_globe::domain::{Category, Period, Record};
use sighting_globe::loader::{DataSource, LoadOutcome, LoadProgress, Loader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

/// Messages from a background load to the event loop.
#[derive(Debug)]
pub enum LoadMessage {
    Progress(LoadProgress),
    Finished(LoadOutcome),
}

#[derive(Debug, Clone)]
pub struct AppActions {
    pub source: Option<DataSource>,
    pub batch_size: usize,
    pub sample_seed: Option<u64>,
}

impl AppActions {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            source: config.data_source(),
            batch_size: config.batch_size,
            sample_seed: config.sample_seed,
        }
    }

    fn loader(&self) -> Loader {
        Loader::new(self.batch_size).with_sample_seed(self.sample_seed)
    }

    pub async fn load(&self) -> LoadOutcome {
        self.loader().load_or_sample(self.source.as_ref()).await
    }

    /// Loads in a background task, forwarding progress and the final outcome.
    pub fn spawn_load(&self) -> (JoinHandle<()>, UnboundedReceiver<LoadMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actions = self.clone();

        let handle = tokio::spawn(async move {
            let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
            let loader = actions.loader().with_progress(progress_tx);

            let progress_sender = sender.clone();
            let relay = tokio::spawn(async move {
                while let Some(progress) = progress_rx.recv().await {
                    if progress_sender.send(LoadMessage::Progress(progress)).is_err() {
                        break;
                    }
                }
            });

            let outcome = loader.load_or_sample(actions.source.as_ref()).await;
            drop(loader);
            let _ = relay.await;
            let _ = sender.send(LoadMessage::Finished(outcome));
        });

        (handle, receiver)
    }
}

pub fn count_by_category<'a, I>(records: I) -> Vec<(Category, usize)>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts = [0usize; 3];
    for record in records {
        counts[record.category.index()] += 1;
    }
    Category::ALL
        .into_iter()
        .map(|category| (category, counts[category.index()]))
        .collect()
}

pub fn count_by_period(records: &[Record]) -> Vec<(Period, usize)> {
    Period::ALL
        .into_iter()
        .map(|period| {
            let count = records
                .iter()
                .filter_map(|record| record.year)
                .filter(|year| period.contains(*year))
                .count();
            (period, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sighting_globe::domain::GeoPoint;

    fn record(category: Category, year: Option<i32>) -> Record {
        Record {
            id: String::new(),
            position: GeoPoint { lat: 0.0, lng: 0.0 },
            category,
            year,
            title: String::new(),
            date: String::new(),
            location: String::new(),
            region: String::new(),
            country: String::new(),
            credibility: 5,
            description: String::new(),
        }
    }

    #[test]
    fn counts_follow_category_and_period_order() {
        let records = vec![
            record(Category::Possible, Some(-100)),
            record(Category::Confirmed, Some(1960)),
            record(Category::Confirmed, None),
        ];
        assert_eq!(
            count_by_category(&records),
            vec![
                (Category::Confirmed, 2),
                (Category::Probable, 0),
                (Category::Possible, 1)
            ]
        );
        assert_eq!(
            count_by_period(&records),
            vec![
                (Period::Ancient, 1),
                (Period::Medieval, 0),
                (Period::Modern, 0),
                (Period::Contemporary, 1)
            ]
        );
    }

    #[tokio::test]
    async fn spawned_load_finishes_with_sample_data() {
        let actions = AppActions {
            source: None,
            batch_size: 10,
            sample_seed: Some(5),
        };
        let (handle, mut receiver) = actions.spawn_load();
        handle.await.unwrap();

        let mut finished = None;
        while let Ok(message) = receiver.try_recv() {
            if let LoadMessage::Finished(outcome) = message {
                finished = Some(outcome);
            }
        }
        let outcome = finished.unwrap();
        assert!(outcome.from_sample);
        assert!(!outcome.records.is_empty());
    }
}
