// Library root: the luck statistics engine and the league history layer
// that assembles its inputs.

pub mod history;
pub mod luck;
pub mod types;
