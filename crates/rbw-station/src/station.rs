use rbw_block::{BlockSerializer, BlockText};
use rbw_card::{BatchReport, CardDriver, CardReader};
use rbw_catalog::TagCatalog;
use rbw_ledger::{ArticleLedger, LedgerSnapshot};
use rbw_types::{ArticleName, BlockRecord, SectorKey};
use tracing::{info, warn};

use crate::config::StationConfig;
use crate::error::{StationError, StationResult};

/// Outcome of one resolved scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanReceipt {
    pub article: ArticleName,
    /// Quantity of the article after this scan.
    pub quantity: u32,
    /// Distinct articles in the ledger after this scan.
    pub rows: usize,
}

/// One scanning session: catalog, ledger and card reader.
pub struct Station<D: CardDriver> {
    config: StationConfig,
    key: SectorKey,
    catalog: TagCatalog,
    ledger: ArticleLedger,
    reader: CardReader<D>,
}

impl<D: CardDriver> Station<D> {
    /// Build a station with the built-in tag catalog.
    pub fn new(config: StationConfig, driver: D) -> StationResult<Self> {
        Self::with_catalog(config, TagCatalog::builtin(), driver)
    }

    pub fn with_catalog(
        config: StationConfig,
        catalog: TagCatalog,
        driver: D,
    ) -> StationResult<Self> {
        config.validate()?;
        let key = config.key()?;
        Ok(Self {
            config,
            key,
            catalog,
            ledger: ArticleLedger::new(),
            reader: CardReader::new(driver),
        })
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &ArticleLedger {
        &self.ledger
    }

    pub fn reader(&self) -> &CardReader<D> {
        &self.reader
    }

    // ---- Scanning ----

    /// Resolve a scanned identifier and count it.
    ///
    /// An unknown identifier leaves the ledger untouched and returns
    /// `TagNotFound`; the session carries on.
    pub fn scan(&mut self, identifier: &str) -> StationResult<ScanReceipt> {
        let article = match self.catalog.resolve(identifier) {
            Ok(article) => article.clone(),
            Err(err) => {
                warn!(tag = identifier.trim(), "unknown RFID tag");
                return Err(err.into());
            }
        };
        let quantity = self.ledger.record_scan(&article);
        let rows = self.ledger.size();
        info!(article = %article, quantity, rows, "article scanned");
        Ok(ScanReceipt {
            article,
            quantity,
            rows,
        })
    }

    pub fn remove(&mut self, article: &str) -> bool {
        self.ledger.remove(article)
    }

    pub fn clear(&mut self) {
        self.ledger.clear();
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    // ---- Card session ----

    /// Connect to the configured reader, or to the first one listed if none
    /// is configured.
    pub fn connect(&self) -> StationResult<String> {
        let name = match &self.config.reader_name {
            Some(name) => name.clone(),
            None => self
                .reader
                .list_readers()?
                .into_iter()
                .next()
                .ok_or(StationError::NoReader)?,
        };
        self.reader.connect(&name)?;
        Ok(name)
    }

    pub fn connect_to(&self, reader: &str) -> StationResult<()> {
        self.reader.connect(reader)?;
        Ok(())
    }

    pub fn disconnect(&self) {
        self.reader.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.reader.is_connected()
    }

    pub fn list_readers(&self) -> StationResult<Vec<String>> {
        Ok(self.reader.list_readers()?)
    }

    // ---- Card writes and reads ----

    /// The records a write at `start_block` would produce from the current
    /// ledger.
    pub fn plan_write(&self, start_block: i64) -> StationResult<Vec<BlockRecord>> {
        let snapshot = self.ledger.snapshot();
        Ok(BlockSerializer::serialize_with_width(
            snapshot.entries(),
            start_block,
            self.config.block_width,
        )?)
    }

    /// Write the current ledger to the card, one article per block from
    /// `start_block` on.
    pub fn write_to_card(&self, start_block: i64) -> StationResult<BatchReport> {
        let records = self.plan_write(start_block)?;
        let report = self.reader.write_records(&self.key, &records)?;
        Ok(report)
    }

    /// Write at the configured start block.
    pub fn write_to_card_default(&self) -> StationResult<BatchReport> {
        self.write_to_card(i64::from(self.config.start_block))
    }

    /// Read one block with the configured key.
    pub fn read_block(&self, block: u32) -> StationResult<Vec<u8>> {
        self.read_block_with(&self.key, block)
    }

    pub fn read_block_with(&self, key: &SectorKey, block: u32) -> StationResult<Vec<u8>> {
        Ok(self.reader.read_block(key, block)?)
    }

    /// Read one block and render it as text.
    pub fn read_text(&self, block: u32) -> StationResult<BlockText> {
        Ok(BlockText::decode(&self.read_block(block)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbw_card::{CardError, MemoryCard, SIMULATED_READER};
    use rbw_catalog::CatalogError;
    use rbw_types::LedgerEntry;

    fn station() -> Station<MemoryCard> {
        Station::new(StationConfig::default(), MemoryCard::new()).unwrap()
    }

    #[test]
    fn scans_accumulate_per_article() {
        let mut s = station();
        s.scan("RFID_1234").unwrap();
        let receipt = s.scan("RFID_1111").unwrap();
        assert_eq!(receipt.article.as_str(), "Premium Coffee Beans");
        assert_eq!(receipt.quantity, 2);
        assert_eq!(receipt.rows, 1);
        assert_eq!(
            s.snapshot().entries(),
            &[LedgerEntry::new("Premium Coffee Beans", 2)]
        );
    }

    #[test]
    fn unknown_tags_leave_ledger_empty() {
        let mut s = station();
        let mut misses = 0;
        for tag in ["RFID_0001", "RFID_0002", "  nope  "] {
            match s.scan(tag) {
                Err(StationError::Catalog(CatalogError::TagNotFound { .. })) => misses += 1,
                other => panic!("expected TagNotFound, got {other:?}"),
            }
        }
        assert_eq!(misses, 3);
        assert_eq!(s.ledger().size(), 0);
    }

    #[test]
    fn connect_picks_first_reader() {
        let s = station();
        assert_eq!(s.connect().unwrap(), SIMULATED_READER);
        assert!(s.is_connected());
        s.disconnect();
        assert!(!s.is_connected());
    }

    #[test]
    fn connect_without_reader() {
        let s = Station::new(StationConfig::default(), MemoryCard::without_reader()).unwrap();
        assert!(matches!(
            s.connect(),
            Err(StationError::Card(CardError::ListReaders(_)))
        ));
    }

    #[test]
    fn configured_reader_must_exist() {
        let config = StationConfig {
            reader_name: Some("Missing Reader".into()),
            ..StationConfig::default()
        };
        let s = Station::new(config, MemoryCard::new()).unwrap();
        assert!(matches!(
            s.connect(),
            Err(StationError::Card(CardError::Connect { .. }))
        ));
    }

    #[test]
    fn write_requires_connection() {
        let mut s = station();
        s.scan("RFID_9012").unwrap();
        assert!(matches!(
            s.write_to_card(4),
            Err(StationError::Card(CardError::NotConnected))
        ));
    }

    #[test]
    fn negative_start_block_rejected_before_card() {
        let mut s = station();
        s.connect().unwrap();
        s.scan("RFID_9012").unwrap();
        assert!(matches!(s.write_to_card(-1), Err(StationError::Block(_))));
        assert!(s.reader().with_driver(|d| d.write_calls().is_empty()).unwrap());
    }

    #[test]
    fn narrow_width_from_config() {
        let config = StationConfig {
            block_width: 4,
            ..StationConfig::default()
        };
        let mut s = Station::new(config, MemoryCard::new()).unwrap();
        s.scan("RFID_5678").unwrap();
        let plan = s.plan_write(1).unwrap();
        assert_eq!(plan, vec![BlockRecord::new(1, b"Orga".to_vec())]);
    }

    #[test]
    fn read_text_of_written_block() {
        let mut s = station();
        s.connect().unwrap();
        s.scan("RFID_9012").unwrap();
        s.write_to_card_default().unwrap();

        let text = s.read_text(4).unwrap();
        assert_eq!(text.text, "Pure Maple Syrup");
    }

    #[test]
    fn empty_ledger_writes_nothing() {
        let s = station();
        s.connect().unwrap();
        let report = s.write_to_card(4).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.planned(), 0);
    }

    #[test]
    fn invalid_key_rejected_at_construction() {
        let config = StationConfig {
            sector_key: "xyz".into(),
            ..StationConfig::default()
        };
        assert!(Station::new(config, MemoryCard::new()).is_err());
    }
}
