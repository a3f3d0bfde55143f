//! The two-phase constraint resolver.
//!
//! `pre_layout` clamps a node's own interval against the parent interval and
//! resolves leaf sizes; `post_layout` folds child sizes back into the parent
//! and, for Row/Column, distributes leftover main-axis extent across flex
//! children. `set_position` is a pure top-down walk assigning parent-relative
//! origins. All three short-circuit to the reference geometry when a node's
//! debug flag is set.
//!
//! With `serial = true`, `pre_layout` drives the entire subtree itself (child
//! pre phases and its own post phase inline). With `serial = false` it only
//! propagates constraints and stops; the task graph drives the rest.

use std::time::Instant;

use parlay_types::{BoxConstraints, EdgeInsets, Point, Size};

use crate::LayoutError;
use crate::env::LayoutEnvironment;
use crate::tree::{BoxKind, LayoutTree, NodeId, StackChild};

/// Main-axis selector unifying the Row and Column algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAxis {
    Horizontal,
    Vertical,
}

impl MainAxis {
    fn main_of(self, size: Size) -> f32 {
        match self {
            MainAxis::Horizontal => size.width,
            MainAxis::Vertical => size.height,
        }
    }

    fn main_max(self, interval: BoxConstraints) -> f32 {
        match self {
            MainAxis::Horizontal => interval.max_width,
            MainAxis::Vertical => interval.max_height,
        }
    }
}

/// What remains to be done after the borrowed setup portion of a pass.
enum PrePlan {
    Done,
    Single {
        child: Option<NodeId>,
        insets: EdgeInsets,
    },
    Stack {
        children: Vec<StackChild>,
    },
    Flex {
        axis: MainAxis,
        children: Vec<NodeId>,
    },
}

enum PostPlan {
    Done,
    Single {
        child: Option<NodeId>,
        insets: EdgeInsets,
        childless_adds_min: bool,
        clamp_childless: bool,
        is_root: bool,
    },
    Flex {
        axis: MainAxis,
        children: Vec<NodeId>,
    },
}

enum PosPlan {
    Done,
    Single { child: Option<NodeId>, offset: Point },
    Stack { children: Vec<NodeId> },
    Flex { axis: MainAxis, children: Vec<NodeId> },
}

impl LayoutTree {
    /// Clamps the node's interval against its parent's and resolves size.
    ///
    /// # Errors
    ///
    /// Propagates measurement failures from the text collaborator, and (when
    /// `serial` drives the post phase inline) flex-distribution errors.
    pub fn pre_layout(
        &self,
        id: NodeId,
        serial: bool,
        env: &LayoutEnvironment,
    ) -> Result<(), LayoutError> {
        let started = Instant::now();
        let plan = {
            let node = self.pass_node_mut(id);
            if node.debug {
                node.apply_reference();
                return Ok(());
            }
            node.constraints.tighten(node.parent_constraints);
            let own = node.constraints;

            match node.kind {
                BoxKind::Sized { width, height } => {
                    node.size = own.constrain(Size::new(width, height));
                    PrePlan::Done
                }
                BoxKind::Image { ref src } => {
                    let intrinsic = match env.images.probe(src) {
                        Some((width, height)) => Size::new(width, height),
                        None => {
                            log::debug!(
                                "image '{}' unreadable via {}; resolving to zero size",
                                src,
                                env.images.name()
                            );
                            Size::zero()
                        }
                    };
                    node.size = own.constrain(intrinsic);
                    PrePlan::Done
                }
                BoxKind::Text {
                    ref content,
                    ref font,
                } => {
                    let metrics = env.text.measure(content, own.max_width, font)?;
                    let measured = Size::new(metrics.width, metrics.height);
                    // Only empty content clamps; measured text may overflow
                    // its interval.
                    node.size = if content.is_empty() {
                        own.constrain(measured)
                    } else {
                        measured
                    };
                    PrePlan::Done
                }
                BoxKind::Padding { child, padding } => PrePlan::Single {
                    child,
                    insets: padding,
                },
                BoxKind::Container {
                    child,
                    padding,
                    margin,
                    ..
                } => PrePlan::Single {
                    child,
                    insets: padding + margin,
                },
                BoxKind::Stack { ref children } => PrePlan::Stack {
                    children: children.clone(),
                },
                BoxKind::Row { ref children } => PrePlan::Flex {
                    axis: MainAxis::Horizontal,
                    children: children.clone(),
                },
                BoxKind::Column { ref children } => PrePlan::Flex {
                    axis: MainAxis::Vertical,
                    children: children.clone(),
                },
            }
        };

        match plan {
            PrePlan::Done => {
                self.pass_node_mut(id).elapsed += started.elapsed();
                Ok(())
            }
            PrePlan::Single { child, insets } => {
                self.pre_single(id, child, insets, serial, env, started)
            }
            PrePlan::Stack { children } => self.pre_stack(id, &children, env),
            PrePlan::Flex { axis, children } => {
                self.pre_flex(id, axis, &children, serial, env, started)
            }
        }
    }

    /// Padding and Container share one pre shape: carve the insets off the
    /// own interval and impose the result on the child.
    fn pre_single(
        &self,
        id: NodeId,
        child: Option<NodeId>,
        insets: EdgeInsets,
        serial: bool,
        env: &LayoutEnvironment,
        started: Instant,
    ) -> Result<(), LayoutError> {
        let own = self.node(id).constraints;
        if let Some(child_id) = child {
            // Minima are not inherited through a wrapper; the child keeps its
            // intrinsic size even under a tight parent interval.
            self.set_constraints(child_id, own.shrink(insets).loosen());
        }
        self.pass_node_mut(id).elapsed += started.elapsed();

        if serial {
            if let Some(child_id) = child {
                self.pre_layout(child_id, true, env)?;
            }
            self.post_layout(id)?;
        }
        Ok(())
    }

    /// Stack never parallelizes: every child runs its full pre phase here,
    /// against the container's own unshrunk interval. Own size per axis is
    /// the max over children of `child + |alignment * child|`; alignment is
    /// never applied again at placement time.
    fn pre_stack(
        &self,
        id: NodeId,
        children: &[StackChild],
        env: &LayoutEnvironment,
    ) -> Result<(), LayoutError> {
        let own = self.node(id).constraints;
        let mut size = Size::zero();

        for stack_child in children {
            self.set_constraints(stack_child.node, own);
            self.pre_layout(stack_child.node, true, env)?;

            let child_size = self.node(stack_child.node).size;
            size.width = size
                .width
                .max(child_size.width + (stack_child.align_x * child_size.width).abs());
            size.height = size
                .height
                .max(child_size.height + (stack_child.align_y * child_size.height).abs());
        }

        self.pass_node_mut(id).size = size;
        Ok(())
    }

    /// Phase A of the flex algorithm: pin the container's cross dimension to
    /// its maximum and hand every fixed child a cross-tight interval. The
    /// main-axis interval of a fixed child is left as its parent interval.
    fn pre_flex(
        &self,
        id: NodeId,
        axis: MainAxis,
        children: &[NodeId],
        serial: bool,
        env: &LayoutEnvironment,
        started: Instant,
    ) -> Result<(), LayoutError> {
        let cross = {
            let node = self.pass_node_mut(id);
            match axis {
                MainAxis::Horizontal => {
                    node.size.height = node.constraints.max_height;
                    node.size.height
                }
                MainAxis::Vertical => {
                    node.size.width = node.constraints.max_width;
                    node.size.width
                }
            }
        };

        for &child_id in children {
            let child = self.node(child_id);
            if child.flex == 0.0 {
                let pc = child.parent_constraints;
                let interval = match axis {
                    MainAxis::Horizontal => {
                        BoxConstraints::new(pc.min_width, pc.max_width, cross, cross)
                    }
                    MainAxis::Vertical => {
                        BoxConstraints::new(cross, cross, pc.min_height, pc.max_height)
                    }
                };
                self.set_constraints(child_id, interval);
            }
        }
        self.pass_node_mut(id).elapsed += started.elapsed();

        if serial {
            for &child_id in children {
                if self.node(child_id).flex == 0.0 {
                    self.pre_layout(child_id, true, env)?;
                }
            }
            // Phase B needs every fixed child resolved.
            self.post_layout(id)?;
            for &child_id in children {
                if self.node(child_id).flex > 0.0 {
                    self.pre_layout(child_id, true, env)?;
                }
            }
        }
        Ok(())
    }

    /// Folds child geometry back into this node.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ConstraintInfeasible`] when fixed children
    /// overrun the main-axis maximum, and [`LayoutError::NoFlexibleChildren`]
    /// when a Row/Column enters its flex phase with zero total weight.
    pub fn post_layout(&self, id: NodeId) -> Result<(), LayoutError> {
        let started = Instant::now();
        let plan = {
            let node = self.pass_node_mut(id);
            if node.debug {
                node.apply_reference();
                return Ok(());
            }
            match node.kind {
                BoxKind::Sized { .. }
                | BoxKind::Image { .. }
                | BoxKind::Text { .. }
                | BoxKind::Stack { .. } => PostPlan::Done,
                BoxKind::Padding { child, padding } => PostPlan::Single {
                    child,
                    insets: padding,
                    childless_adds_min: false,
                    clamp_childless: true,
                    is_root: false,
                },
                BoxKind::Container {
                    child,
                    padding,
                    margin,
                    is_root,
                } => PostPlan::Single {
                    child,
                    insets: padding + margin,
                    childless_adds_min: true,
                    clamp_childless: false,
                    is_root,
                },
                BoxKind::Row { ref children } => PostPlan::Flex {
                    axis: MainAxis::Horizontal,
                    children: children.clone(),
                },
                BoxKind::Column { ref children } => PostPlan::Flex {
                    axis: MainAxis::Vertical,
                    children: children.clone(),
                },
            }
        };

        match plan {
            PostPlan::Done => Ok(()),
            PostPlan::Single {
                child,
                insets,
                childless_adds_min,
                clamp_childless,
                is_root,
            } => {
                let size = match child {
                    Some(child_id) => {
                        let child_size = self.node(child_id).size;
                        Size::new(
                            child_size.width + insets.horizontal(),
                            child_size.height + insets.vertical(),
                        )
                    }
                    None => {
                        let node = self.node(id);
                        let mut size = Size::new(insets.horizontal(), insets.vertical());
                        if childless_adds_min {
                            // Childless containers add their minimum without
                            // re-clamping.
                            size.width += node.constraints.min_width;
                            size.height += node.constraints.min_height;
                        }
                        if clamp_childless {
                            size = node.constraints.constrain(size);
                        }
                        size
                    }
                };
                let node = self.pass_node_mut(id);
                node.size = size;
                if is_root {
                    // The root fills the viewport regardless of content.
                    node.size = Size::new(
                        node.parent_constraints.min_width,
                        node.parent_constraints.min_height,
                    );
                }
                node.elapsed += started.elapsed();
                Ok(())
            }
            PostPlan::Flex { axis, children } => self.post_flex(id, axis, &children, started),
        }
    }

    /// Phase B: distribute the main-axis extent left by fixed children over
    /// flex children as exact tight shares, in stored order.
    fn post_flex(
        &self,
        id: NodeId,
        axis: MainAxis,
        children: &[NodeId],
        started: Instant,
    ) -> Result<(), LayoutError> {
        let own = self.node(id).constraints;
        let max_main = axis.main_max(own);
        let cross = match axis {
            MainAxis::Horizontal => self.node(id).size.height,
            MainAxis::Vertical => self.node(id).size.width,
        };

        let mut available = max_main;
        let mut total_flex = 0.0f32;
        for &child_id in children {
            let child = self.node(child_id);
            if child.flex == 0.0 {
                available -= axis.main_of(child.size);
            }
            total_flex += child.flex;
        }

        if available < 0.0 {
            return Err(LayoutError::ConstraintInfeasible {
                node: id,
                available,
            });
        }
        if total_flex == 0.0 {
            return Err(LayoutError::NoFlexibleChildren { node: id });
        }

        let chunk = available / total_flex;
        for &child_id in children {
            let flex = self.node(child_id).flex;
            if flex > 0.0 {
                let share = chunk * flex;
                available -= share;
                let interval = match axis {
                    MainAxis::Horizontal => BoxConstraints::new(share, share, cross, cross),
                    MainAxis::Vertical => BoxConstraints::new(cross, cross, share, share),
                };
                self.set_constraints(child_id, interval);
            }
        }

        let node = self.pass_node_mut(id);
        match axis {
            MainAxis::Horizontal => node.size.width = max_main - available,
            MainAxis::Vertical => node.size.height = max_main - available,
        }
        node.elapsed += started.elapsed();
        Ok(())
    }

    /// Assigns this node's parent-relative origin and every child's local
    /// origin. Pure walk over resolved geometry; run once, after layout.
    pub fn set_position(&self, id: NodeId, x: f32, y: f32) {
        let plan = {
            let node = self.pass_node_mut(id);
            if node.debug {
                node.apply_reference();
                return;
            }
            node.x = x;
            node.y = y;
            match node.kind {
                BoxKind::Sized { .. } | BoxKind::Image { .. } | BoxKind::Text { .. } => {
                    PosPlan::Done
                }
                BoxKind::Padding { child, padding } => PosPlan::Single {
                    child,
                    offset: Point::new(padding.left, padding.top),
                },
                BoxKind::Container {
                    child,
                    padding,
                    margin,
                    ..
                } => PosPlan::Single {
                    child,
                    offset: Point::new(margin.left + padding.left, margin.top + padding.top),
                },
                BoxKind::Stack { ref children } => PosPlan::Stack {
                    children: children.iter().map(|c| c.node).collect(),
                },
                BoxKind::Row { ref children } => PosPlan::Flex {
                    axis: MainAxis::Horizontal,
                    children: children.clone(),
                },
                BoxKind::Column { ref children } => PosPlan::Flex {
                    axis: MainAxis::Vertical,
                    children: children.clone(),
                },
            }
        };

        match plan {
            PosPlan::Done => {}
            PosPlan::Single { child, offset } => {
                if let Some(child_id) = child {
                    self.set_position(child_id, offset.x, offset.y);
                }
            }
            PosPlan::Stack { children } => {
                // Alignment scalars only ever inflated the container's size;
                // every child sits at the local origin.
                for child_id in children {
                    self.set_position(child_id, 0.0, 0.0);
                }
            }
            PosPlan::Flex { axis, children } => {
                let mut cursor = 0.0f32;
                for child_id in children {
                    match axis {
                        MainAxis::Horizontal => self.set_position(child_id, cursor, 0.0),
                        MainAxis::Vertical => self.set_position(child_id, 0.0, cursor),
                    }
                    cursor += axis.main_of(self.node(child_id).size);
                }
            }
        }
    }
}
