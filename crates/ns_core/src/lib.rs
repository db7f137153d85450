pub mod browser;
pub mod dates;
pub mod error;
pub mod signals;
pub mod storage;
pub mod types;

pub use browser::{BoxedElement, BrowserSession, Locator, PageElement, SessionFactory, WaitCondition};
pub use error::Error;
pub use storage::RecordSink;
pub use types::{ArticleRecord, CardFields, MonthsValue, RunParameters, WorkItem};

pub type Result<T> = std::result::Result<T, Error>;
