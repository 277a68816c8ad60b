#![allow(dead_code)]

use json_mapper::{FieldError, JsonObject, JsonObjectExt, JsonSerializable};

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl JsonSerializable for Position {
    fn serialize(&self) -> JsonObject {
        let mut json = JsonObject::new();
        json.put("x", &self.x).put("y", &self.y);
        json
    }

    fn reconstruct(json: &JsonObject) -> Result<Self, FieldError> {
        Ok(Self {
            x: json.required("x")?,
            y: json.required("y")?,
        })
    }

    fn type_name() -> &'static str {
        "Position"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub level: u32,
    pub position: Position,
    pub inventory: Vec<String>,
    pub guild: Option<String>,
}

impl JsonSerializable for Player {
    fn serialize(&self) -> JsonObject {
        let mut json = JsonObject::new();
        json.put("name", &self.name)
            .put("level", &self.level)
            .put("position", &self.position.serialize())
            .put("inventory", &self.inventory)
            .put("guild", &self.guild);
        json
    }

    fn reconstruct(json: &JsonObject) -> Result<Self, FieldError> {
        let level: u32 = json.required("level")?;
        if level == 0 {
            return Err(FieldError::invariant("level starts at 1"));
        }

        Ok(Self {
            name: json.required("name")?,
            level,
            position: Position::reconstruct(json.required_object("position")?)?,
            inventory: json.optional("inventory")?.unwrap_or_default(),
            guild: json.optional("guild")?,
        })
    }

    fn type_name() -> &'static str {
        "Player"
    }
}

pub fn sample_player() -> Player {
    Player {
        name: "Mira".to_string(),
        level: 12,
        position: Position { x: 4.5, y: -2.0 },
        inventory: vec!["lantern".to_string(), "rope".to_string()],
        guild: None,
    }
}
