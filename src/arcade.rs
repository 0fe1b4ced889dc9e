//! Arcade physics: axis-aligned sprite bodies in a bounded world.
//!
//! Bodies integrate gravity and velocity, clamp to the world bounds, then
//! every registered pair rule runs in registration order. Colliders separate
//! the bodies (Y axis first, gravity is vertical) and reflect the separated
//! velocity by the body's bounce; overlaps only report.
//!
//! Coordinates are screen-space pixels with y growing downward. A sprite's
//! position is its center.

use crate::anims::AnimationState;

/// Extra penetration tolerated beyond the frame's movement before a contact
/// is treated as "already inside" and left unresolved on that axis.
const OVERLAP_BIAS: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RuleId(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug)]
pub struct Body {
    pub position: Vec2,
    prev: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub bounce: Vec2,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
    /// Static bodies never move and ignore gravity.
    pub immovable: bool,
    pub enabled: bool,
    /// Contacts with other bodies this step.
    pub touching: Contacts,
    /// Contacts with the world bounds this step.
    pub blocked: Contacts,
}

impl Body {
    fn new(position: Vec2, size: Vec2, immovable: bool) -> Self {
        Self {
            position,
            prev: position,
            size,
            velocity: Vec2::default(),
            bounce: Vec2::default(),
            allow_gravity: !immovable,
            collide_world_bounds: false,
            immovable,
            enabled: true,
            touching: Contacts::default(),
            blocked: Contacts::default(),
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x / 2.0
    }

    pub fn top(&self) -> f32 {
        self.position.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }

    fn delta(&self) -> Vec2 {
        Vec2::new(
            self.position.x - self.prev.x,
            self.position.y - self.prev.y,
        )
    }

    pub fn intersects(&self, other: &Body) -> bool {
        !(self.right() <= other.left()
            || self.bottom() <= other.top()
            || self.left() >= other.right()
            || self.top() >= other.bottom())
    }
}

/// A game object with a physics body: texture, frame, tint and visibility
/// plus the body that drives its position.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub texture: String,
    pub frame: u16,
    /// Unscaled size of one texture frame.
    pub frame_size: Vec2,
    pub scale: f32,
    pub visible: bool,
    pub tint: Option<u32>,
    pub anim: AnimationState,
    pub group: Option<GroupId>,
    pub body: Body,
}

impl Sprite {
    pub fn x(&self) -> f32 {
        self.body.position.x
    }

    pub fn y(&self) -> f32 {
        self.body.position.y
    }

    /// Drawn size: frame size times scale.
    pub fn display_size(&self) -> Vec2 {
        Vec2::new(self.frame_size.x * self.scale, self.frame_size.y * self.scale)
    }

    pub fn is_active(&self) -> bool {
        self.body.enabled
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Static,
    Dynamic,
}

#[derive(Clone, Debug)]
pub struct Group {
    pub kind: GroupKind,
    pub members: Vec<SpriteId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Sprite(SpriteId),
    Group(GroupId),
}

impl From<SpriteId> for Target {
    fn from(id: SpriteId) -> Self {
        Target::Sprite(id)
    }
}

impl From<GroupId> for Target {
    fn from(id: GroupId) -> Self {
        Target::Group(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairMode {
    Collide,
    Overlap,
}

#[derive(Clone, Copy, Debug)]
struct PairRule {
    a: Target,
    b: Target,
    mode: PairMode,
    notify: bool,
}

/// Raised when a notifying rule finds its two sprites in contact. `a` comes
/// from the rule's first target, `b` from its second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsEvent {
    pub rule: RuleId,
    pub a: SpriteId,
    pub b: SpriteId,
}

#[derive(Clone, Debug)]
pub struct World {
    pub bounds: Bounds,
    pub gravity: Vec2,
    paused: bool,
    sprites: Vec<Sprite>,
    groups: Vec<Group>,
    rules: Vec<PairRule>,
}

impl World {
    pub fn new(width: f32, height: f32, gravity_y: f32) -> Self {
        Self {
            bounds: Bounds { x: 0.0, y: 0.0, width, height },
            gravity: Vec2::new(0.0, gravity_y),
            paused: false,
            sprites: Vec::new(),
            groups: Vec::new(),
            rules: Vec::new(),
        }
    }

    // ── Objects ───────────────────────────────────────────────────────────────

    /// Add a free-standing dynamic sprite.
    pub fn add_sprite(&mut self, x: f32, y: f32, texture: &str, frame_size: Vec2) -> SpriteId {
        self.push_sprite(x, y, texture, frame_size, None, false)
    }

    pub fn add_group(&mut self, kind: GroupKind) -> GroupId {
        self.groups.push(Group { kind, members: Vec::new() });
        GroupId(self.groups.len() - 1)
    }

    /// Create a sprite as a member of `group`; static groups produce
    /// immovable bodies.
    pub fn create_in_group(
        &mut self,
        group: GroupId,
        x: f32,
        y: f32,
        texture: &str,
        frame_size: Vec2,
    ) -> SpriteId {
        let immovable = self.groups[group.0].kind == GroupKind::Static;
        let id = self.push_sprite(x, y, texture, frame_size, Some(group), immovable);
        self.groups[group.0].members.push(id);
        id
    }

    fn push_sprite(
        &mut self,
        x: f32,
        y: f32,
        texture: &str,
        frame_size: Vec2,
        group: Option<GroupId>,
        immovable: bool,
    ) -> SpriteId {
        self.sprites.push(Sprite {
            texture: texture.to_string(),
            frame: 0,
            frame_size,
            scale: 1.0,
            visible: true,
            tint: None,
            anim: AnimationState::default(),
            group,
            body: Body::new(Vec2::new(x, y), frame_size, immovable),
        });
        SpriteId(self.sprites.len() - 1)
    }

    pub fn sprite(&self, id: SpriteId) -> &Sprite {
        &self.sprites[id.0]
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> &mut Sprite {
        &mut self.sprites[id.0]
    }

    pub fn sprites(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.sprites.iter().enumerate().map(|(i, s)| (SpriteId(i), s))
    }

    pub fn sprites_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.iter_mut()
    }

    pub fn members(&self, group: GroupId) -> &[SpriteId] {
        &self.groups[group.0].members
    }

    pub fn count_active(&self, group: GroupId) -> usize {
        self.members(group)
            .iter()
            .filter(|id| self.sprites[id.0].is_active())
            .count()
    }

    pub fn set_scale(&mut self, id: SpriteId, scale: f32) {
        self.sprites[id.0].scale = scale;
    }

    /// Re-sync the body size to the sprite's scaled frame. Static bodies keep
    /// their creation size until this is called.
    pub fn refresh_body(&mut self, id: SpriteId) {
        let sprite = &mut self.sprites[id.0];
        sprite.body.size = sprite.display_size();
    }

    /// Stop the body taking part in physics; optionally hide the sprite.
    pub fn disable_body(&mut self, id: SpriteId, hide: bool) {
        let sprite = &mut self.sprites[id.0];
        sprite.body.enabled = false;
        if hide {
            sprite.visible = false;
        }
    }

    /// Re-enable a body at `(x, y)` with zero velocity.
    pub fn enable_body(&mut self, id: SpriteId, x: f32, y: f32, show: bool) {
        let sprite = &mut self.sprites[id.0];
        let body = &mut sprite.body;
        body.position = Vec2::new(x, y);
        body.prev = body.position;
        body.velocity = Vec2::default();
        body.touching = Contacts::default();
        body.blocked = Contacts::default();
        body.enabled = true;
        if show {
            sprite.visible = true;
        }
    }

    // ── Pair rules ────────────────────────────────────────────────────────────

    /// Resolve contacts between `a` and `b`; emits events when `notify`.
    pub fn add_collider(&mut self, a: impl Into<Target>, b: impl Into<Target>, notify: bool) -> RuleId {
        self.push_rule(a.into(), b.into(), PairMode::Collide, notify)
    }

    /// Report contacts between `a` and `b` without separating them.
    pub fn add_overlap(&mut self, a: impl Into<Target>, b: impl Into<Target>) -> RuleId {
        self.push_rule(a.into(), b.into(), PairMode::Overlap, true)
    }

    fn push_rule(&mut self, a: Target, b: Target, mode: PairMode, notify: bool) -> RuleId {
        self.rules.push(PairRule { a, b, mode, notify });
        RuleId(self.rules.len() - 1)
    }

    fn expand(&self, target: Target) -> Vec<SpriteId> {
        match target {
            Target::Sprite(id) => vec![id],
            Target::Group(g) => self.groups[g.0].members.clone(),
        }
    }

    // ── Simulation ────────────────────────────────────────────────────────────

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance every enabled body by `dt` seconds and run the pair rules.
    /// A paused world does nothing.
    pub fn step(&mut self, dt: f32) -> Vec<PhysicsEvent> {
        if self.paused {
            return Vec::new();
        }

        let gravity = self.gravity;
        let bounds = self.bounds;
        for sprite in &mut self.sprites {
            let body = &mut sprite.body;
            body.touching = Contacts::default();
            body.blocked = Contacts::default();
            body.prev = body.position;
            if !body.enabled || body.immovable {
                continue;
            }
            if body.allow_gravity {
                body.velocity.x += gravity.x * dt;
                body.velocity.y += gravity.y * dt;
            }
            body.position.x += body.velocity.x * dt;
            body.position.y += body.velocity.y * dt;
            if body.collide_world_bounds {
                clamp_to_bounds(body, &bounds);
            }
        }

        let mut events = Vec::new();
        for index in 0..self.rules.len() {
            let rule = self.rules[index];
            let left = self.expand(rule.a);
            let right = self.expand(rule.b);
            for &a in &left {
                for &b in &right {
                    if a == b || !self.pair_live(a, b) {
                        continue;
                    }
                    let hit = match rule.mode {
                        PairMode::Overlap => self.sprites[a.0].body.intersects(&self.sprites[b.0].body),
                        PairMode::Collide => self.separate(a, b),
                    };
                    if hit && rule.notify {
                        events.push(PhysicsEvent { rule: RuleId(index), a, b });
                    }
                }
            }
        }
        events
    }

    fn pair_live(&self, a: SpriteId, b: SpriteId) -> bool {
        self.sprites[a.0].body.enabled && self.sprites[b.0].body.enabled
    }

    /// Push two intersecting bodies apart. Returns whether they intersected.
    fn separate(&mut self, a: SpriteId, b: SpriteId) -> bool {
        let (body_a, body_b) = pair_mut(&mut self.sprites, a.0, b.0);
        if !body_a.intersects(body_b) {
            return false;
        }
        if body_a.immovable && body_b.immovable {
            return true;
        }
        separate_y(body_a, body_b);
        if body_a.intersects(body_b) {
            separate_x(body_a, body_b);
        }
        true
    }
}

fn pair_mut(sprites: &mut [Sprite], a: usize, b: usize) -> (&mut Body, &mut Body) {
    if a < b {
        let (lo, hi) = sprites.split_at_mut(b);
        (&mut lo[a].body, &mut hi[0].body)
    } else {
        let (lo, hi) = sprites.split_at_mut(a);
        (&mut hi[0].body, &mut lo[b].body)
    }
}

fn clamp_to_bounds(body: &mut Body, bounds: &Bounds) {
    let half_w = body.size.x / 2.0;
    let half_h = body.size.y / 2.0;
    if body.position.x - half_w < bounds.x {
        body.position.x = bounds.x + half_w;
        body.velocity.x = -body.velocity.x * body.bounce.x;
        body.blocked.left = true;
    } else if body.position.x + half_w > bounds.x + bounds.width {
        body.position.x = bounds.x + bounds.width - half_w;
        body.velocity.x = -body.velocity.x * body.bounce.x;
        body.blocked.right = true;
    }
    if body.position.y - half_h < bounds.y {
        body.position.y = bounds.y + half_h;
        body.velocity.y = -body.velocity.y * body.bounce.y;
        body.blocked.up = true;
    } else if body.position.y + half_h > bounds.y + bounds.height {
        body.position.y = bounds.y + bounds.height - half_h;
        body.velocity.y = -body.velocity.y * body.bounce.y;
        body.blocked.down = true;
    }
}

/// Penetration depth along one axis, signed so that a positive value means
/// `a` must move toward negative coordinates. Zero when the bodies were
/// already overlapping by more than this step's movement explains.
fn overlap_along(a_delta: f32, b_delta: f32, a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    let max_overlap = a_delta.abs() + b_delta.abs() + OVERLAP_BIAS;
    if a_delta > b_delta {
        let overlap = a_max - b_min;
        if overlap > max_overlap { 0.0 } else { overlap }
    } else if a_delta < b_delta {
        let overlap = a_min - b_max;
        if -overlap > max_overlap { 0.0 } else { overlap }
    } else {
        0.0
    }
}

fn separate_y(a: &mut Body, b: &mut Body) {
    let overlap = overlap_along(a.delta().y, b.delta().y, a.top(), a.bottom(), b.top(), b.bottom());
    if overlap == 0.0 {
        return;
    }
    if overlap > 0.0 {
        a.touching.down = true;
        b.touching.up = true;
    } else {
        a.touching.up = true;
        b.touching.down = true;
    }
    let (va, vb) = (a.velocity.y, b.velocity.y);
    match (a.immovable, b.immovable) {
        (false, true) => {
            a.position.y -= overlap;
            a.velocity.y = vb - va * a.bounce.y;
        }
        (true, false) => {
            b.position.y += overlap;
            b.velocity.y = va - vb * b.bounce.y;
        }
        _ => {
            a.position.y -= overlap / 2.0;
            b.position.y += overlap / 2.0;
            let (na, nb) = exchange(va, vb, a.bounce.y, b.bounce.y);
            a.velocity.y = na;
            b.velocity.y = nb;
        }
    }
}

fn separate_x(a: &mut Body, b: &mut Body) {
    let overlap = overlap_along(a.delta().x, b.delta().x, a.left(), a.right(), b.left(), b.right());
    if overlap == 0.0 {
        return;
    }
    if overlap > 0.0 {
        a.touching.right = true;
        b.touching.left = true;
    } else {
        a.touching.left = true;
        b.touching.right = true;
    }
    let (va, vb) = (a.velocity.x, b.velocity.x);
    match (a.immovable, b.immovable) {
        (false, true) => {
            a.position.x -= overlap;
            a.velocity.x = vb - va * a.bounce.x;
        }
        (true, false) => {
            b.position.x += overlap;
            b.velocity.x = va - vb * b.bounce.x;
        }
        _ => {
            a.position.x -= overlap / 2.0;
            b.position.x += overlap / 2.0;
            let (na, nb) = exchange(va, vb, a.bounce.x, b.bounce.x);
            a.velocity.x = na;
            b.velocity.x = nb;
        }
    }
}

/// Equal-mass velocity exchange around the shared average.
fn exchange(va: f32, vb: f32, bounce_a: f32, bounce_b: f32) -> (f32, f32) {
    let avg = (va + vb) * 0.5;
    (avg + (vb - avg) * bounce_a, avg + (va - avg) * bounce_b)
}
