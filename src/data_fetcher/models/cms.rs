use crate::constants::cms_pages;

/// CMS pages published as scalar snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmsPage {
    TournamentInformation,
    LeaderboardInformation,
    ScoringRulesInformation,
}

impl CmsPage {
    /// Page identifier on the content service
    pub fn page_id(&self) -> &'static str {
        match self {
            CmsPage::TournamentInformation => cms_pages::TOURNAMENT_INFORMATION,
            CmsPage::LeaderboardInformation => cms_pages::LEADERBOARD_INFORMATION,
            CmsPage::ScoringRulesInformation => cms_pages::SCORING_RULES_INFORMATION,
        }
    }
}
