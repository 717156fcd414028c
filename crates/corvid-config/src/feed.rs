use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PAGE_SIZE: usize = 40;

/// How blocks influence which posts a viewer gets to see
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockVisibility {
    /// Only the viewer's own edge towards the author is consulted
    #[default]
    Directional,

    /// Additionally hide authors that have blocked the viewer
    Bidirectional,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default)]
    pub block_visibility: BlockVisibility,
}

fn default_max_page_size() -> usize {
    DEFAULT_MAX_PAGE_SIZE
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            block_visibility: BlockVisibility::default(),
        }
    }
}
