// Team drafting: players, the draft aggregate, eligibility rules and the
// session controller that ties them together.

pub mod builder;
pub mod payload;
pub mod player;
pub mod roster;
pub mod rules;
