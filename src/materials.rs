//! Material to color-tag lookup.
//!
//! Only the materials the geometry core labels are listed; the full
//! taxonomy lives with the scene assembler. Unknown materials have no
//! color tags.

const MATERIAL_COLORS: &[(&str, &[&str])] = &[
    ("AI2-THOR/Materials/Metals/BrushedAluminum_Blue", &["blue"]),
    ("AI2-THOR/Materials/Metals/GenericStainlessSteel", &["grey"]),
    ("AI2-THOR/Materials/Plastics/BlackPlastic", &["black"]),
    ("AI2-THOR/Materials/Wood/DarkWoodSmooth2", &["black"]),
    ("AI2-THOR/Materials/Wood/LightWoodCounters 1", &["brown"]),
    ("AI2-THOR/Materials/Wood/WornWood", &["brown"]),
    ("Custom/Materials/Azure", &["azure", "blue"]),
    ("Custom/Materials/Black", &["black"]),
    ("Custom/Materials/Brown", &["brown"]),
    ("Custom/Materials/Chartreuse", &["chartreuse", "green"]),
    ("Custom/Materials/Cyan", &["cyan", "blue"]),
    ("Custom/Materials/Goldenrod", &["goldenrod", "yellow"]),
    ("Custom/Materials/Green", &["green"]),
    ("Custom/Materials/Grey", &["grey"]),
    ("Custom/Materials/Indigo", &["indigo", "blue"]),
    ("Custom/Materials/Lime", &["lime", "green"]),
    ("Custom/Materials/Magenta", &["magenta", "purple"]),
    ("Custom/Materials/Maroon", &["maroon", "red"]),
    ("Custom/Materials/Navy", &["navy", "blue"]),
    ("Custom/Materials/Olive", &["olive", "green"]),
    ("Custom/Materials/Orange", &["orange"]),
    ("Custom/Materials/Red", &["red"]),
    ("Custom/Materials/Rose", &["rose", "red"]),
    ("Custom/Materials/Silver", &["silver", "grey"]),
    ("Custom/Materials/Teal", &["teal", "blue", "green"]),
    ("Custom/Materials/Violet", &["violet", "purple"]),
    ("Custom/Materials/White", &["white"]),
    ("Custom/Materials/Yellow", &["yellow"]),
    (
        "UnityAssetStore/Wooden_Toys_Bundle/ToyBlocks/meshes/Materials/red_1x1",
        &["red"],
    ),
];

pub fn find_colors(material: &str) -> &'static [&'static str] {
    MATERIAL_COLORS
        .iter()
        .find(|(name, _)| *name == material)
        .map(|&(_, colors)| colors)
        .unwrap_or(&[])
}

/// Debug labels for an object: each color tag, then a readable
/// description such as "azure blue tool".
pub fn color_labels(material: &str, noun: &str) -> Vec<String> {
    let colors = find_colors(material);
    let mut labels: Vec<String> =
        colors.iter().map(|c| c.to_string()).collect();
    if colors.is_empty() {
        labels.push(noun.to_string());
    } else {
        labels.push(format!("{} {}", colors.join(" "), noun));
    }
    labels
}
