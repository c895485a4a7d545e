use crate::compiler::{compile, compile_fallback};
use crate::error::AbortReason;
use crate::model::{ModuleNode, Switchboard};
use crate::store::ModuleStore;
use crate::tree::{resolve_root, validate_tree};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use tracing::warn;

/// Builds the whole dialplan of a switchboard.
///
/// Properties are fetched concurrently, at most `concurrency` at a time, but
/// fragments land in the artifact in input order: root first, then the other
/// modules as `nodes` lists them. A failed fetch only degrades that module.
pub async fn assemble(
    store: &dyn ModuleStore,
    switchboard: &Switchboard,
    nodes: &[ModuleNode],
    concurrency: usize,
) -> Result<String, AbortReason> {
    if nodes.is_empty() {
        return Err(AbortReason::EmptyTree);
    }
    let root = resolve_root(nodes)?;
    validate_tree(root, nodes)?;

    let mut order = vec![root];
    order.extend(nodes.iter().filter(|n| n.id != root.id));
    let fetches: Vec<_> = order
        .into_iter()
        .map(|node| fragment(store, switchboard, node, nodes, node.id == root.id).boxed())
        .collect();
    let fragments: Vec<String> = stream::iter(fetches)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut conf = header(switchboard);
    for fragment in fragments {
        conf += &fragment;
        conf += "\n";
    }
    Ok(conf)
}

async fn fragment(
    store: &dyn ModuleStore,
    switchboard: &Switchboard,
    node: &ModuleNode,
    nodes: &[ModuleNode],
    is_root: bool,
) -> String {
    match store.load_module_properties(node.id).await {
        Ok(properties) => compile(is_root, node, nodes, &properties),
        Err(e) => {
            warn!(
                switchboard = switchboard.id,
                module = node.id,
                "can't load module properties, using fallback: {e:#}"
            );
            compile_fallback(is_root, node, nodes)
        }
    }
}

fn header(switchboard: &Switchboard) -> String {
    format!(
        "; ACCESS LINE\n\
         [scotip_user_{code}]\n\
         exten => start,1,Goto(dialplan_user_{id},start,1)\n\
         \n\
         ; DIALPLAN CONFIGURATION\n\
         [dialplan_user_{id}]\n\
         exten => start,1,Answer()\n",
        code = switchboard.access_code,
        id = switchboard.id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{module, switchboard, MemoryStore};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn menu() -> Vec<ModuleNode> {
        vec![
            module(11, Some(10), "1", "playback"),
            module(10, None, "", "read"),
            module(12, Some(10), "2", "playback"),
            module(13, Some(12), "1", "unknown-kind"),
        ]
    }

    fn store() -> MemoryStore {
        MemoryStore::default()
            .with_file(10, "menu")
            .with_file(11, "sales")
            .with_file(12, "support")
    }

    const EXPECTED: &str = "; ACCESS LINE\n\
        [scotip_user_700]\n\
        exten => start,1,Goto(dialplan_user_7,start,1)\n\
        \n\
        ; DIALPLAN CONFIGURATION\n\
        [dialplan_user_7]\n\
        exten => start,1,Answer()\n\
        same => n,Macro(wheretogo,10,\"menu\",\"scotip/200/invalidKey\")\n\
        \n\
        \n; MODULE [11] playback\n\
        exten => mod10key1,1,Playback(sales)\n\
        \n\
        \n; MODULE [12] playback\n\
        exten => mod10key2,1,Playback(support)\n\
        same => n,Macro(wheretogo,12,\"silence/1\",\"scotip/200/invalidKey\")\n\
        \n\
        \n; MODULE [13] unknown-kind\n\
        exten => mod12key1,1,Playback(error)\n\
        \n";

    #[tokio::test]
    async fn assembles_root_then_load_order() {
        let conf = assemble(&store(), &switchboard(7), &menu(), 4).await.unwrap();
        assert_eq!(conf, EXPECTED);
    }

    #[tokio::test]
    async fn completion_order_does_not_leak_into_artifact() {
        // the root and the first listed modules answer last
        let slow = store()
            .with_delay(10, 60)
            .with_delay(11, 40)
            .with_delay(12, 20);
        let conf = assemble(&slow, &switchboard(7), &menu(), 4).await.unwrap();
        assert_eq!(conf, EXPECTED);
        assert!(slow.max_in_flight.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let slow = store()
            .with_delay(10, 10)
            .with_delay(11, 10)
            .with_delay(12, 10)
            .with_delay(13, 10);
        assemble(&slow, &switchboard(7), &menu(), 2).await.unwrap();
        assert!(slow.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn one_root_and_n_modules_give_n_plus_one_fragments() {
        let conf = assemble(&store(), &switchboard(7), &menu(), 4).await.unwrap();
        assert_eq!(conf.matches("; ACCESS LINE").count(), 1);
        assert_eq!(conf.matches("[dialplan_user_7]").count(), 1);
        assert_eq!(conf.matches("same => n,Macro(wheretogo,10,").count(), 1);
        assert_eq!(conf.matches("; MODULE [").count(), 3);
    }

    #[tokio::test]
    async fn failed_fetch_degrades_only_that_module() {
        let mut failing = store();
        failing.failing.insert(11);
        let conf = assemble(&failing, &switchboard(7), &menu(), 4).await.unwrap();
        assert!(conf.contains("exten => mod10key1,1,Playback(error)\n"));
        assert!(conf.contains("exten => mod10key2,1,Playback(support)\n"));
    }

    #[tokio::test]
    async fn root_only_switchboard() {
        let nodes = vec![module(1, None, "", "playback")];
        let store = MemoryStore::default().with_file(1, "closed");
        let conf = assemble(&store, &switchboard(3), &nodes, 4).await.unwrap();
        assert!(conf.ends_with("exten => start,1,Answer()\nsame => n,Playback(closed)\n\n"));
    }

    #[tokio::test]
    async fn structural_errors_abort() {
        let store = store();
        assert_eq!(
            assemble(&store, &switchboard(7), &[], 4).await,
            Err(AbortReason::EmptyTree)
        );
        let two_roots = vec![module(1, None, "", "read"), module(2, None, "", "read")];
        assert_eq!(
            assemble(&store, &switchboard(7), &two_roots, 4).await,
            Err(AbortReason::MultipleRoots)
        );
        let no_root = vec![module(2, Some(1), "1", "read")];
        assert_eq!(
            assemble(&store, &switchboard(7), &no_root, 4).await,
            Err(AbortReason::NoRoot)
        );
    }

    #[tokio::test]
    async fn sibling_key_collision_is_rejected() {
        let nodes = vec![
            module(1, None, "", "read"),
            module(2, Some(1), "1", "playback"),
            module(3, Some(1), "1", "playback"),
        ];
        assert!(matches!(
            assemble(&store(), &switchboard(7), &nodes, 4).await,
            Err(AbortReason::DuplicatePhoneKey { parent: 1, .. })
        ));
    }

    #[tokio::test]
    async fn assembles_on_a_spawned_task() {
        let store: Arc<dyn ModuleStore> = Arc::new(store().with_delay(10, 20));
        let conf = tokio::spawn(async move {
            assemble(store.as_ref(), &switchboard(7), &menu(), 4).await
        })
        .await
        .unwrap()
        .unwrap();
        assert_eq!(conf, EXPECTED);
    }

    #[tokio::test]
    async fn regeneration_is_byte_identical() {
        let store = store();
        let first = assemble(&store, &switchboard(7), &menu(), 4).await.unwrap();
        let second = assemble(&store, &switchboard(7), &menu(), 4).await.unwrap();
        assert_eq!(first, second);
    }
}
