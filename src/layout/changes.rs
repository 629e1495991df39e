//! Graph-level edits on top of the body/spring store.
//!
//! Callers that think in nodes and links rather than bodies and springs describe
//! their edits as [`GraphChange`]s; missing physical values are filled in from the
//! layout's config.
use std::fmt;

use log::debug;
use rand::Rng;

use crate::layout::Layout;
use crate::models::{Body, Spring, Vector2D};
use crate::utils::{LayoutConfig, LayoutError, RANDOM_PLACEMENT_EXTENT};

/// A link to create. Unset values come from the layout's [`crate::utils::SpringDefaults`].
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    pub id: String,
    pub from: String,
    pub to: String,
    pub rest_length: Option<f64>,
    pub weight: Option<f64>,
}

impl LinkSpec {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        LinkSpec {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            rest_length: None,
            weight: None,
        }
    }

    pub fn with_rest_length(mut self, rest_length: f64) -> Self {
        self.rest_length = Some(rest_length);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Mass given to a new node from its id and the number of springs touching it.
pub type NodeMassFn = fn(&str, usize) -> f64;

/// Adjusts a spring built from a link before it is stored.
pub type SpringTransformFn = fn(&LinkSpec, &mut Spring);

/// Per-layout overrides for how graph changes become bodies and springs.
#[derive(Clone, Copy)]
pub struct GraphHooks {
    pub node_mass: NodeMassFn,
    pub spring_transform: Option<SpringTransformFn>,
}

impl Default for GraphHooks {
    fn default() -> Self {
        GraphHooks {
            node_mass: degree_mass,
            spring_transform: None,
        }
    }
}

impl fmt::Debug for GraphHooks {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GraphHooks")
            .field("spring_transform", &self.spring_transform.is_some())
            .finish_non_exhaustive()
    }
}

impl GraphHooks {
    pub fn with_node_mass(mut self, node_mass: NodeMassFn) -> Self {
        self.node_mass = node_mass;
        self
    }

    pub fn with_spring_transform(mut self, spring_transform: SpringTransformFn) -> Self {
        self.spring_transform = Some(spring_transform);
        self
    }
}

/// Default node mass: [`LayoutConfig::default_body_mass`] of the degree.
pub fn degree_mass(_id: &str, degree: usize) -> f64 {
    LayoutConfig::default_body_mass(degree)
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphChange {
    /// Adds a node. Without a position it is placed at random.
    AddNode { id: String, position: Option<Vector2D> },
    AddLink(LinkSpec),
    RemoveNode { id: String },
    RemoveLink { id: String },
}

impl Layout {
    pub fn graph_hooks(&self) -> GraphHooks {
        self.hooks
    }

    /// Replaces the hooks used by later graph changes. Existing bodies and springs
    /// are left as they are.
    pub fn set_graph_hooks(&mut self, hooks: GraphHooks) {
        self.hooks = hooks;
    }

    /// Applies `changes` in order.
    ///
    /// Adding a node that already exists and linking to a node that does not are
    /// ignored. Removing something absent is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use force_layout::layout::{GraphChange, Layout, LinkSpec};
    /// use force_layout::models::Vector2D;
    /// use force_layout::utils::LayoutConfig;
    ///
    /// let mut layout = Layout::new(vec![], vec![], LayoutConfig::default()).expect("valid layout");
    /// layout
    ///     .apply_changes(&[
    ///         GraphChange::AddNode { id: "a".into(), position: Some(Vector2D::new(0.0, 0.0)) },
    ///         GraphChange::AddNode { id: "b".into(), position: None },
    ///         GraphChange::AddLink(LinkSpec::new("ab", "a", "b")),
    ///     ])
    ///     .expect("valid changes");
    /// assert_eq!(layout.body_count(), 2);
    /// assert_eq!(layout.get_spring("ab").rest_length, 80.0);
    /// ```
    pub fn apply_changes(&mut self, changes: &[GraphChange]) -> Result<(), LayoutError> {
        for change in changes {
            match change {
                GraphChange::AddNode { id, position } => self.add_node(id, *position)?,
                GraphChange::AddLink(link) => self.add_link(link)?,
                GraphChange::RemoveNode { id } => {
                    self.remove_body(id);
                }
                GraphChange::RemoveLink { id } => {
                    self.remove_spring(id);
                }
            }
        }
        Ok(())
    }

    /// Adds a body for a graph node. Its mass comes from the node-mass hook, which by
    /// default grows with the number of springs already touching `id`.
    pub fn add_node(&mut self, id: &str, position: Option<Vector2D>) -> Result<(), LayoutError> {
        if self.body(id).is_some() {
            return Ok(());
        }
        let position = position.unwrap_or_else(|| self.random_position());
        let mass = (self.hooks.node_mass)(id, self.degree(id));
        self.set_body(id, Body::new(id, position, mass)?)
    }

    /// Adds a spring for a graph link if both endpoints exist. The spring-transform
    /// hook sees the spring before it is validated and stored.
    pub fn add_link(&mut self, link: &LinkSpec) -> Result<(), LayoutError> {
        if self.body(&link.from).is_none() || self.body(&link.to).is_none() {
            debug!("ignoring link {}: {} or {} is not a body", link.id, link.from, link.to);
            return Ok(());
        }
        let defaults = self.config().springs;
        let mut spring = Spring::new(
            link.id.as_str(),
            link.from.as_str(),
            link.to.as_str(),
            defaults.stiffness,
            link.rest_length.unwrap_or(defaults.rest_length),
            link.weight.unwrap_or(defaults.weight),
        )?;
        if let Some(transform) = self.hooks.spring_transform {
            transform(link, &mut spring);
        }
        self.set_spring(&link.id, spring)
    }

    /// Builds a layout from node ids and links in one go.
    ///
    /// Node masses account for every link, including those listed after the node.
    pub fn from_graph(node_ids: &[&str], links: &[LinkSpec], config: LayoutConfig) -> Result<Layout, LayoutError> {
        Layout::from_graph_with_hooks(node_ids, links, config, GraphHooks::default())
    }

    /// [`Layout::from_graph`] with custom node-mass and spring-transform hooks.
    pub fn from_graph_with_hooks(
        node_ids: &[&str],
        links: &[LinkSpec],
        config: LayoutConfig,
        hooks: GraphHooks,
    ) -> Result<Layout, LayoutError> {
        let mut layout = Layout::new(Vec::new(), Vec::new(), config)?;
        layout.set_graph_hooks(hooks);
        for id in node_ids {
            let degree = links.iter().filter(|l| l.from == *id || l.to == *id).count();
            if layout.body(id).is_some() {
                continue;
            }
            let position = layout.random_position();
            let mass = (hooks.node_mass)(*id, degree);
            layout.set_body(id, Body::new(*id, position, mass)?)?;
        }
        for link in links {
            layout.add_link(link)?;
        }
        Ok(layout)
    }

    fn degree(&self, id: &str) -> usize {
        self.springs_touching(id).count()
    }

    /// Uniform point in the square of half-width [`RANDOM_PLACEMENT_EXTENT`] around the origin.
    fn random_position(&mut self) -> Vector2D {
        let extent = RANDOM_PLACEMENT_EXTENT;
        Vector2D::new(
            self.rng.random_range(-extent..extent),
            self.rng.random_range(-extent..extent),
        )
    }
}
