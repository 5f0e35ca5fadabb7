pub use self::alias::*;
pub use self::options::*;
pub use self::stylesheet::*;

mod alias;
mod options;
mod stylesheet;
