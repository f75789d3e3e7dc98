use shared::domain::{CatalogEntry, GameId};

const COLLEGES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "iitb",
        display_name: "IIT Bombay",
        logo_asset: "/Media/colleges/iitb.png",
        description: Some("Indian Institute of Technology Bombay, Mumbai"),
    },
    CatalogEntry {
        id: "iitd",
        display_name: "IIT Delhi",
        logo_asset: "/Media/colleges/iitd.png",
        description: Some("Indian Institute of Technology Delhi, New Delhi"),
    },
    CatalogEntry {
        id: "bits",
        display_name: "BITS Pilani",
        logo_asset: "/Media/colleges/bits.png",
        description: Some("Birla Institute of Technology and Science, Pilani"),
    },
    CatalogEntry {
        id: "nitt",
        display_name: "NIT Trichy",
        logo_asset: "/Media/colleges/nitt.png",
        description: None,
    },
    CatalogEntry {
        id: "dtu",
        display_name: "Delhi Technological University",
        logo_asset: "/Media/colleges/dtu.png",
        description: None,
    },
    CatalogEntry {
        id: "vit",
        display_name: "VIT Vellore",
        logo_asset: "/Media/colleges/vit.png",
        description: None,
    },
];

const GAMES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "bgmi",
        display_name: "Battlegrounds Mobile India",
        logo_asset: "/Media/games/bgmi.png",
        description: Some("Squad battle royale, 4 players per team"),
    },
    CatalogEntry {
        id: "cod",
        display_name: "Call of Duty: Mobile",
        logo_asset: "/Media/games/cod.png",
        description: Some("5v5 multiplayer, search and destroy"),
    },
    CatalogEntry {
        id: "valorant",
        display_name: "Valorant",
        logo_asset: "/Media/games/valorant.png",
        description: Some("5v5 tactical shooter"),
    },
    CatalogEntry {
        id: "freefire",
        display_name: "Free Fire",
        logo_asset: "/Media/games/freefire.png",
        description: Some("Squad battle royale, 4 players per team"),
    },
];

/// Colleges in display order.
pub fn list_colleges() -> &'static [CatalogEntry] {
    COLLEGES
}

/// Games in display order.
pub fn list_games() -> &'static [CatalogEntry] {
    GAMES
}

pub trait Catalog: Send + Sync {
    fn colleges(&self) -> &[CatalogEntry];
    fn games(&self) -> &[CatalogEntry];

    fn college(&self, id: &str) -> Option<&CatalogEntry> {
        self.colleges().iter().find(|entry| entry.id == id)
    }

    fn game(&self, id: &str) -> Option<&CatalogEntry> {
        self.games().iter().find(|entry| entry.id == id)
    }

    fn game_ids(&self) -> Vec<GameId> {
        self.games().iter().map(|entry| GameId::new(entry.id)).collect()
    }
}

/// The compiled-in catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl Catalog for StaticCatalog {
    fn colleges(&self) -> &[CatalogEntry] {
        list_colleges()
    }

    fn games(&self) -> &[CatalogEntry] {
        list_games()
    }
}
