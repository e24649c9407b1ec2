/// One row of the tournament-winners dataset.
///
/// Country and team columns are stored in their normalised form, so `"Germany FR"` reads
/// as `"Germany"`.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentRecord {
    pub year: i32,
    /// Host country.
    pub country: String,
    pub winner: String,
    pub runners_up: String,
    pub third: String,
    pub fourth: String,
    pub goals_scored: Option<u32>,
    pub qualified_teams: Option<u32>,
    pub matches_played: Option<u32>,
}
