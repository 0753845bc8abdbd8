use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::api::types::NodeId;
use crate::components::entity::Node;

#[derive(Debug, Clone, Default)]
struct Links {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Scene graph: flat node storage plus parent/child links.
/// Designed for small node counts (tens, not millions).
pub struct Scene {
    nodes: Vec<Node>,
    links: HashMap<NodeId, Links>,
    /// Top-level nodes in insertion order.
    roots: Vec<NodeId>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(64),
            links: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique node ID.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a top-level node.
    pub fn spawn(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.links.entry(id).or_default();
        self.roots.push(id);
        self.nodes.push(node);
        id
    }

    /// Add a node as a child of `parent`. Falls back to top-level if the
    /// parent is unknown.
    pub fn spawn_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = node.id;
        if !self.links.contains_key(&parent) {
            log::warn!("spawn_child: unknown parent {:?}, adding {:?} as root", parent, id);
            return self.spawn(node);
        }
        self.links.entry(id).or_default().parent = Some(parent);
        if let Some(links) = self.links.get_mut(&parent) {
            links.children.push(id);
        }
        self.nodes.push(node);
        id
    }

    /// Get a reference to a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get a mutable reference to a node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(&id).and_then(|l| l.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.links
            .get(&id)
            .map(|l| l.children.as_slice())
            .unwrap_or(&[])
    }

    /// Find the first node with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.tag == tag)
    }

    /// Iterate over all nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// World matrix of a node, composed up through its ancestors.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut matrix = self.get(id)?.local_matrix();
        let mut current = self.parent(id);
        while let Some(parent_id) = current {
            let parent = self.get(parent_id)?;
            matrix = parent.local_matrix() * matrix;
            current = self.parent(parent_id);
        }
        Some(matrix)
    }

    /// World-space position of a node's origin.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// Visit every visible node depth-first with its world matrix.
    /// Hidden nodes prune their whole subtree.
    pub fn visit_visible(&self, mut f: impl FnMut(&Node, Mat4)) {
        for &root in &self.roots {
            self.visit_recursive(root, Mat4::IDENTITY, &mut f);
        }
    }

    fn visit_recursive(&self, id: NodeId, parent: Mat4, f: &mut impl FnMut(&Node, Mat4)) {
        let Some(node) = self.get(id) else { return };
        if !node.visible {
            return;
        }
        let world = parent * node.local_matrix();
        f(node, world);
        for &child in self.children(id) {
            self.visit_recursive(child, world, f);
        }
    }

    /// Number of nodes in the scene.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
