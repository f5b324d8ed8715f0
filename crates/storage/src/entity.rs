//! Static catalog of the entities exposed through the API.
//!
//! Every column name that ever reaches SQL text comes from this catalog, never
//! from the request. Filter, sort, search and inclusion whitelists are all
//! derived from the descriptors below.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Academy,
    Coach,
    Player,
    PlayerProfile,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        Self::User,
        Self::Academy,
        Self::Coach,
        Self::Player,
        Self::PlayerProfile,
    ];

    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            Self::User => &USER,
            Self::Academy => &ACADEMY,
            Self::Coach => &COACH,
            Self::Player => &PLAYER,
            Self::PlayerProfile => &PLAYER_PROFILE,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.descriptor().name
    }

    pub fn table(self) -> &'static str {
        self.descriptor().table
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown entity '{0}'")]
pub struct UnknownEntity(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEntity(s.to_string()))
    }
}

/// Value type of a column, used to parse filter values from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Uuid,
    Text,
    Timestamp,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid => f.write_str("uuid"),
            Self::Text => f.write_str("text"),
            Self::Timestamp => f.write_str("timestamp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub filterable: bool,
    pub sortable: bool,
    pub searchable: bool,
    /// Entity this column points at, if it is a foreign key.
    pub references: Option<EntityKind>,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            filterable: false,
            sortable: false,
            searchable: false,
            references: None,
        }
    }

    const fn filter(self) -> Self {
        Self {
            filterable: true,
            ..self
        }
    }

    const fn sort(self) -> Self {
        Self {
            sortable: true,
            ..self
        }
    }

    const fn search(self) -> Self {
        Self {
            searchable: true,
            ..self
        }
    }
}

const fn id() -> FieldSpec {
    FieldSpec::new("id", FieldKind::Uuid).filter().sort()
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldKind::Text)
}

const fn foreign_key(name: &'static str, target: EntityKind) -> FieldSpec {
    FieldSpec {
        references: Some(target),
        ..FieldSpec::new(name, FieldKind::Uuid).filter()
    }
}

const fn timestamp(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldKind::Timestamp).filter().sort()
}

/// How a relation is joined to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// The owner holds `column` pointing at the target's id.
    BelongsTo { column: &'static str },
    /// The target holds `column` pointing at the owner's id.
    HasMany { column: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationSpec {
    pub name: &'static str,
    pub target: EntityKind,
    pub link: Link,
}

const fn belongs_to(name: &'static str, target: EntityKind, column: &'static str) -> RelationSpec {
    RelationSpec {
        name,
        target,
        link: Link::BelongsTo { column },
    }
}

const fn has_many(name: &'static str, target: EntityKind, column: &'static str) -> RelationSpec {
    RelationSpec {
        name,
        target,
        link: Link::HasMany { column },
    }
}

#[derive(Debug)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub name: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    pub relations: &'static [RelationSpec],
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        let fields: &'static [FieldSpec] = self.fields;
        fields.iter().find(|field| field.name == name)
    }

    pub fn filter_field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.field(name).filter(|field| field.filterable)
    }

    pub fn sort_field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.field(name).filter(|field| field.sortable)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + use<> {
        let fields: &'static [FieldSpec] = self.fields;
        fields.iter().filter(|field| field.searchable)
    }

    pub fn relation(&self, name: &str) -> Option<&'static RelationSpec> {
        let relations: &'static [RelationSpec] = self.relations;
        relations.iter().find(|relation| relation.name == name)
    }

    /// One-to-many relations, the ones `_count` reports on.
    pub fn has_many_relations(&self) -> impl Iterator<Item = &'static RelationSpec> + use<> {
        let relations: &'static [RelationSpec] = self.relations;
        relations
            .iter()
            .filter(|relation| matches!(relation.link, Link::HasMany { .. }))
    }
}

static USER: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::User,
    name: "user",
    table: "users",
    fields: &[
        id(),
        text("email").filter().sort().search(),
        text("first_name").filter().sort().search(),
        text("last_name").filter().sort().search(),
        text("roq_user_id").filter(),
        timestamp("created_at"),
        timestamp("updated_at"),
    ],
    relations: &[
        has_many("academy", EntityKind::Academy, "user_id"),
        has_many("coach", EntityKind::Coach, "user_id"),
        has_many("player", EntityKind::Player, "user_id"),
    ],
};

static ACADEMY: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Academy,
    name: "academy",
    table: "academies",
    fields: &[
        id(),
        text("name").filter().sort().search(),
        text("description").filter().search(),
        text("image").filter(),
        foreign_key("user_id", EntityKind::User),
        timestamp("created_at"),
        timestamp("updated_at"),
    ],
    relations: &[
        belongs_to("user", EntityKind::User, "user_id"),
        has_many("coach", EntityKind::Coach, "academy_id"),
        has_many("player", EntityKind::Player, "academy_id"),
    ],
};

static COACH: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Coach,
    name: "coach",
    table: "coaches",
    fields: &[
        id(),
        text("name").filter().sort().search(),
        text("status").filter().sort(),
        foreign_key("user_id", EntityKind::User),
        foreign_key("academy_id", EntityKind::Academy),
        timestamp("created_at"),
        timestamp("updated_at"),
    ],
    relations: &[
        belongs_to("user", EntityKind::User, "user_id"),
        belongs_to("academy", EntityKind::Academy, "academy_id"),
        has_many("player", EntityKind::Player, "coach_id"),
        has_many("player_profile", EntityKind::PlayerProfile, "coach_id"),
    ],
};

static PLAYER: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Player,
    name: "player",
    table: "players",
    fields: &[
        id(),
        text("name").filter().sort().search(),
        text("status").filter().sort(),
        foreign_key("user_id", EntityKind::User),
        foreign_key("academy_id", EntityKind::Academy),
        foreign_key("coach_id", EntityKind::Coach),
        timestamp("created_at"),
        timestamp("updated_at"),
    ],
    relations: &[
        belongs_to("user", EntityKind::User, "user_id"),
        belongs_to("academy", EntityKind::Academy, "academy_id"),
        belongs_to("coach", EntityKind::Coach, "coach_id"),
        has_many("player_profile", EntityKind::PlayerProfile, "player_id"),
    ],
};

static PLAYER_PROFILE: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::PlayerProfile,
    name: "player_profile",
    table: "player_profiles",
    fields: &[
        id(),
        text("position").filter().sort().search(),
        text("skill_level").filter().sort(),
        text("performance_notes").search(),
        foreign_key("player_id", EntityKind::Player),
        foreign_key("coach_id", EntityKind::Coach),
        timestamp("created_at"),
        timestamp("updated_at"),
    ],
    relations: &[
        belongs_to("player", EntityKind::Player, "player_id"),
        belongs_to("coach", EntityKind::Coach, "coach_id"),
    ],
};
