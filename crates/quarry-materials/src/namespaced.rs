//! Namespaced string ids for the primary ids shared with newer serialisations.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

const NAMESPACED_IDS: [&str; 198] = [
    // 0
    "minecraft:air", "minecraft:stone", "minecraft:grass", "minecraft:dirt",
    // 4
    "minecraft:cobblestone", "minecraft:planks", "minecraft:sapling", "minecraft:bedrock",
    // 8
    "minecraft:flowing_water", "minecraft:water", "minecraft:flowing_lava", "minecraft:lava",
    // 12
    "minecraft:sand", "minecraft:gravel", "minecraft:gold_ore", "minecraft:iron_ore",
    // 16
    "minecraft:coal_ore", "minecraft:log", "minecraft:leaves", "minecraft:sponge",
    // 20
    "minecraft:glass", "minecraft:lapis_ore", "minecraft:lapis_block", "minecraft:dispenser",
    // 24
    "minecraft:sandstone", "minecraft:noteblock", "minecraft:bed", "minecraft:golden_rail",
    // 28
    "minecraft:detector_rail", "minecraft:sticky_piston", "minecraft:web", "minecraft:tallgrass",
    // 32
    "minecraft:deadbush", "minecraft:piston", "minecraft:piston_head", "minecraft:wool",
    // 36
    "minecraft:piston_extension", "minecraft:yellow_flower", "minecraft:red_flower", "minecraft:brown_mushroom",
    // 40
    "minecraft:red_mushroom", "minecraft:gold_block", "minecraft:iron_block", "minecraft:double_stone_slab",
    // 44
    "minecraft:stone_slab", "minecraft:brick_block", "minecraft:tnt", "minecraft:bookshelf",
    // 48
    "minecraft:mossy_cobblestone", "minecraft:obsidian", "minecraft:torch", "minecraft:fire",
    // 52
    "minecraft:mob_spawner", "minecraft:oak_stairs", "minecraft:chest", "minecraft:redstone_wire",
    // 56
    "minecraft:diamond_ore", "minecraft:diamond_block", "minecraft:crafting_table", "minecraft:wheat",
    // 60
    "minecraft:farmland", "minecraft:furnace", "minecraft:lit_furnace", "minecraft:standing_sign",
    // 64
    "minecraft:wooden_door", "minecraft:ladder", "minecraft:rail", "minecraft:stone_stairs",
    // 68
    "minecraft:wall_sign", "minecraft:lever", "minecraft:stone_pressure_plate", "minecraft:iron_door",
    // 72
    "minecraft:wooden_pressure_plate", "minecraft:redstone_ore", "minecraft:lit_redstone_ore", "minecraft:unlit_redstone_torch",
    // 76
    "minecraft:redstone_torch", "minecraft:stone_button", "minecraft:snow_layer", "minecraft:ice",
    // 80
    "minecraft:snow", "minecraft:cactus", "minecraft:clay", "minecraft:reeds",
    // 84
    "minecraft:jukebox", "minecraft:fence", "minecraft:pumpkin", "minecraft:netherrack",
    // 88
    "minecraft:soul_sand", "minecraft:glowstone", "minecraft:portal", "minecraft:lit_pumpkin",
    // 92
    "minecraft:cake", "minecraft:unpowered_repeater", "minecraft:powered_repeater", "minecraft:stained_glass",
    // 96
    "minecraft:trapdoor", "minecraft:monster_egg", "minecraft:stonebrick", "minecraft:brown_mushroom_block",
    // 100
    "minecraft:red_mushroom_block", "minecraft:iron_bars", "minecraft:glass_pane", "minecraft:melon_block",
    // 104
    "minecraft:pumpkin_stem", "minecraft:melon_stem", "minecraft:vine", "minecraft:fence_gate",
    // 108
    "minecraft:brick_stairs", "minecraft:stone_brick_stairs", "minecraft:mycelium", "minecraft:waterlily",
    // 112
    "minecraft:nether_brick", "minecraft:nether_brick_fence", "minecraft:nether_brick_stairs", "minecraft:nether_wart",
    // 116
    "minecraft:enchanting_table", "minecraft:brewing_stand", "minecraft:cauldron", "minecraft:end_portal",
    // 120
    "minecraft:end_portal_frame", "minecraft:end_stone", "minecraft:dragon_egg", "minecraft:redstone_lamp",
    // 124
    "minecraft:lit_redstone_lamp", "minecraft:double_wooden_slab", "minecraft:wooden_slab", "minecraft:cocoa",
    // 128
    "minecraft:sandstone_stairs", "minecraft:emerald_ore", "minecraft:ender_chest", "minecraft:tripwire_hook",
    // 132
    "minecraft:tripwire", "minecraft:emerald_block", "minecraft:spruce_stairs", "minecraft:birch_stairs",
    // 136
    "minecraft:jungle_stairs", "minecraft:command_block", "minecraft:beacon", "minecraft:cobblestone_wall",
    // 140
    "minecraft:flower_pot", "minecraft:carrots", "minecraft:potatoes", "minecraft:wooden_button",
    // 144
    "minecraft:skull", "minecraft:anvil", "minecraft:trapped_chest", "minecraft:light_weighted_pressure_plate",
    // 148
    "minecraft:heavy_weighted_pressure_plate", "minecraft:unpowered_comparator", "minecraft:powered_comparator", "minecraft:daylight_detector",
    // 152
    "minecraft:redstone_block", "minecraft:quartz_ore", "minecraft:hopper", "minecraft:quartz_block",
    // 156
    "minecraft:quartz_stairs", "minecraft:activator_rail", "minecraft:dropper", "minecraft:stained_hardened_clay",
    // 160
    "minecraft:stained_glass_pane", "minecraft:leaves2", "minecraft:log2", "minecraft:acacia_stairs",
    // 164
    "minecraft:dark_oak_stairs", "minecraft:slime", "minecraft:barrier", "minecraft:iron_trapdoor",
    // 168
    "minecraft:prismarine", "minecraft:sea_lantern", "minecraft:hay_block", "minecraft:carpet",
    // 172
    "minecraft:hardened_clay", "minecraft:coal_block", "minecraft:packed_ice", "minecraft:double_plant",
    // 176
    "minecraft:standing_banner", "minecraft:wall_banner", "minecraft:daylight_detector_inverted", "minecraft:red_sandstone",
    // 180
    "minecraft:red_sandstone_stairs", "minecraft:double_stone_slab2", "minecraft:stone_slab2", "minecraft:spruce_fence_gate",
    // 184
    "minecraft:birch_fence_gate", "minecraft:jungle_fence_gate", "minecraft:dark_oak_fence_gate", "minecraft:acacia_fence_gate",
    // 188
    "minecraft:spruce_fence", "minecraft:birch_fence", "minecraft:jungle_fence", "minecraft:dark_oak_fence",
    // 192
    "minecraft:acacia_fence", "minecraft:spruce_door", "minecraft:birch_door", "minecraft:jungle_door",
    // 196
    "minecraft:acacia_door", "minecraft:dark_oak_door",
];

/// Namespaced string id of `primary`, or `None` past the end of the table.
pub fn namespaced_id(primary: u16) -> Option<&'static str> {
    NAMESPACED_IDS.get(primary as usize).copied()
}

/// Reverse of [`namespaced_id`].
pub fn primary_for_namespaced(name: &str) -> Option<u16> {
    static REVERSE: OnceLock<FxHashMap<&'static str, u16>> = OnceLock::new();
    REVERSE
        .get_or_init(|| {
            NAMESPACED_IDS
                .iter()
                .enumerate()
                .map(|(primary, &name)| (name, primary as u16))
                .collect()
        })
        .get(name)
        .copied()
}

/// Number of primary ids covered by the table.
pub fn namespaced_len() -> usize {
    NAMESPACED_IDS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_entries() {
        assert_eq!(namespaced_id(0), Some("minecraft:air"));
        assert_eq!(namespaced_id(8), Some("minecraft:flowing_water"));
        assert_eq!(namespaced_id(161), Some("minecraft:leaves2"));
        assert_eq!(namespaced_id(162), Some("minecraft:log2"));
        assert_eq!(namespaced_id(197), Some("minecraft:dark_oak_door"));
        assert_eq!(namespaced_id(198), None);
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(primary_for_namespaced("minecraft:stone"), Some(1));
        assert_eq!(primary_for_namespaced("minecraft:sea_lantern"), Some(169));
        assert_eq!(primary_for_namespaced("stone"), None);
        for primary in 0..namespaced_len() as u16 {
            let name = namespaced_id(primary).unwrap();
            assert_eq!(primary_for_namespaced(name), Some(primary));
        }
    }

    #[test]
    fn test_every_entry_namespaced() {
        assert!(NAMESPACED_IDS.iter().all(|n| n.starts_with("minecraft:")));
    }
}
