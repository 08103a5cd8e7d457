//! Archive downloads: end-of-day bhavcopies.
//!
//! Files are saved as served (ZIP or CSV); extraction is left to the caller.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::client::NseClient;
use crate::error::Result;

impl NseClient {
    /// Cash-market bhavcopy (UDiFF format, zipped) for `date`.
    ///
    /// **Archive:** `/content/cm/BhavCopy_NSE_CM_0_0_0_{YYYYMMDD}_F_0000.csv.zip`
    pub async fn equity_bhavcopy(&self, date: NaiveDate, dir: &Path) -> Result<PathBuf> {
        let path = format!(
            "/content/cm/BhavCopy_NSE_CM_0_0_0_{}_F_0000.csv.zip",
            date.format("%Y%m%d")
        );
        self.download(&path, dir).await
    }

    /// Full bhavcopy with delivery data (CSV) for `date`.
    ///
    /// **Archive:** `/products/content/sec_bhavdata_full_{DDMMYYYY}.csv`
    pub async fn delivery_bhavcopy(&self, date: NaiveDate, dir: &Path) -> Result<PathBuf> {
        let path = format!(
            "/products/content/sec_bhavdata_full_{}.csv",
            date.format("%d%m%Y")
        );
        self.download(&path, dir).await
    }
}
