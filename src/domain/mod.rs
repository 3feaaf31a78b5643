//! Доменная модель стола: карты, фишки, места, раздача, блайнды, турнир.

pub mod blinds;
pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod player;
pub mod table;
pub mod tournament;

// Базовые идентификаторы.
pub type PlayerId = u64;
pub type TableId = u64;

pub use blinds::*;
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use table::*;
pub use tournament::*;
