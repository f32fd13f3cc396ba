mod clock;
mod random;
mod scanner;

pub use clock::SystemClock;
pub use random::ThreadRandomSource;
pub use scanner::WalkdirArchiveScanner;
