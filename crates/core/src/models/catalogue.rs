//! Movie catalogue models: genres, actors and movies

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    /// Unique across all genres
    pub name: String,
}

impl Genre {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl Actor {
    pub fn new(first_name: String, last_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// A film that can be scheduled into sessions
///
/// Actor and genre links are many-to-many and live in join tables,
/// so they are carried here as id lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub actor_ids: Vec<Uuid>,
    pub genre_ids: Vec<Uuid>,
}

impl Movie {
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            actor_ids: Vec::new(),
            genre_ids: Vec::new(),
        }
    }

    pub fn with_actors(mut self, actor_ids: Vec<Uuid>) -> Self {
        self.actor_ids = actor_ids;
        self
    }

    pub fn with_genres(mut self, genre_ids: Vec<Uuid>) -> Self {
        self.genre_ids = genre_ids;
        self
    }
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_display() {
        let actor = Actor::new("Keanu".to_string(), "Reeves".to_string());
        assert_eq!(actor.to_string(), "Keanu Reeves");
    }

    #[test]
    fn test_movie_links() {
        let actor = Uuid::new_v4();
        let genre = Uuid::new_v4();
        let movie = Movie::new("Speed".to_string(), "A bus".to_string())
            .with_actors(vec![actor])
            .with_genres(vec![genre]);

        assert_eq!(movie.actor_ids, vec![actor]);
        assert_eq!(movie.genre_ids, vec![genre]);
        assert_eq!(movie.to_string(), "Speed");
    }
}
