//! Static catalog: hosted games shown on the landing page and the plan slugs
//! the pricing table uses.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub image: &'static str,
    pub accent: &'static str,
    pub link: &'static str,
}

pub const GAMES: &[GameInfo] = &[
    GameInfo {
        id: "terraria",
        title: "Terraria",
        description: "Build, fight, dig, and explore in the world of Terraria. Our servers provide the perfect environment for your journey with zero lag and high reliability.",
        price: "$2/GB",
        image: "assets/images/games/Terraria.png",
        accent: "#ff6600",
        link: "products/terraria.html",
    },
    GameInfo {
        id: "minecraft",
        title: "Minecraft",
        description: "Experience the ultimate sandbox adventure with our high-performance Minecraft servers. Support for all versions, mods, and plugins with one-click installation.",
        price: "$1/GB",
        image: "assets/images/games/minecraft.jpg",
        accent: "#00ff1e",
        link: "products/minecraft.html",
    },
    GameInfo {
        id: "palworld",
        title: "Palworld",
        description: "Catch, build, and survive in the mysterious world of Palworld. Our powerful hardware ensures a smooth multiplayer experience for you and your friends.",
        price: "$2/GB",
        image: "assets/images/games/palworld.jpg",
        accent: "#18c8ff",
        link: "products/palworld.html",
    },
    // The page markup uses this spelling as the element id.
    GameInfo {
        id: "velheim",
        title: "Valheim",
        description: "A battle-slain warrior, the Valkyries have borne your soul to Valheim, the tenth Norse world. Conquer the wilderness and build your legacy on our stable servers.",
        price: "$2/GB",
        image: "assets/images/games/valheim.jpg",
        accent: "#fcb516",
        link: "products/valheim.html",
    },
    GameInfo {
        id: "gta",
        title: "GTA V (FiveM)",
        description: "Join the most vibrant roleplay communities or create your own with our FiveM ready servers. Optimized for performance and stability.",
        price: "$2/GB",
        image: "assets/images/games/gta.jpg",
        accent: "#8e44ad",
        link: "products/gta.html",
    },
    GameInfo {
        id: "ark",
        title: "ARK Survival",
        description: "Stranded on the shores of a mysterious island, you must learn to survive. Tame dinosaurs and conquer the Ark on our high-RAM performance servers.",
        price: "$2/GB",
        image: "assets/images/games/ark.jpg",
        accent: "#00ff1e",
        link: "products/ark.html",
    },
    GameInfo {
        id: "rust",
        title: "Rust",
        description: "The only goal in Rust is to survive. Overcome struggles such as hunger, thirst and cold. Our DDoS protected servers keep you in the fight 24/7.",
        price: "$2/GB",
        image: "assets/images/games/rust.webp",
        accent: "#e62f22",
        link: "products/rust.html",
    },
];

/// Details card for `id`, or `None` for an unknown game.
pub fn show_game(id: &str) -> Option<&'static GameInfo> {
    GAMES.iter().find(|g| g.id == id)
}

/// Plan slug to WHMCS product id.
pub const PLAN_PRODUCTS: &[(&str, u32)] = &[
    ("starter", 1),
    ("professional", 2),
    ("business", 3),
    ("vps_basic", 4),
    ("vps_advanced", 5),
    ("vps_enterprise", 6),
];

pub fn product_id_for_plan(plan: &str) -> Option<u32> {
    PLAN_PRODUCTS
        .iter()
        .find(|(slug, _)| *slug == plan)
        .map(|(_, pid)| *pid)
}
