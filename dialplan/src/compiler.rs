use crate::model::{find_property, ModuleKind, ModuleNode, PropertySetting};

const INVALID_KEY_SOUND: &str = "scotip/200/invalidKey";
const SILENCE_SOUND: &str = "silence/1";
const ERROR_STEP: &str = "Playback(error)\n";

/// Name of the extension a parent menu jumps to when `phone_key` is pressed.
pub fn extension_name(parent_id: i64, phone_key: &str) -> String {
    format!("mod{parent_id}key{phone_key}")
}

/// Compiles one module into its dialplan fragment.
///
/// The root continues the `start` extension; every other module opens its own
/// extension named after its parent and key. Unsupported kinds compile to an
/// error announcement, so this never fails.
pub fn compile(
    is_root: bool,
    node: &ModuleNode,
    nodes: &[ModuleNode],
    properties: &[PropertySetting],
) -> String {
    let mut conf = header(is_root, node);
    let file = find_property("file", properties).unwrap_or_default();
    match node.kind() {
        // a menu read routes every outcome itself
        ModuleKind::Read => return conf + &where_to_go(node.id, file),
        ModuleKind::Playback => conf += &format!("Playback({file})\n"),
        ModuleKind::Unsupported(_) => conf += ERROR_STEP,
    }
    conf + &children_fallback(node, nodes)
}

/// Fragment for a module whose settings could not be loaded.
///
/// The extension header is kept so the parent menu still lands somewhere,
/// and the caller hears the error announcement.
pub fn compile_fallback(is_root: bool, node: &ModuleNode, nodes: &[ModuleNode]) -> String {
    header(is_root, node) + ERROR_STEP + &children_fallback(node, nodes)
}

fn header(is_root: bool, node: &ModuleNode) -> String {
    if is_root {
        return "same => n,".to_string();
    }
    // only the root lacks a parent, and the root never takes this path
    let parent = node.parent_id.unwrap_or_default();
    format!(
        "\n; MODULE [{}] {}\nexten => {},1,",
        node.id,
        node.slug,
        extension_name(parent, &node.phone_key)
    )
}

fn where_to_go(module_id: i64, file: &str) -> String {
    format!("Macro(wheretogo,{module_id},\"{file}\",\"{INVALID_KEY_SOUND}\")\n")
}

fn children_fallback(node: &ModuleNode, nodes: &[ModuleNode]) -> String {
    if node.has_children(nodes) {
        format!("same => n,{}", where_to_go(node.id, SILENCE_SOUND))
    } else {
        String::new()
    }
}
