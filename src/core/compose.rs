//! Room composition: resolves a template's token strings against a
//! modifier, sampled fragments and an optional room function.

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::core::repository::{DescriptorRepository, RepositoryError};
use crate::core::text::{has_unresolved_braces, resolve_articles, tidy, Piece};
use crate::core::token::{FragmentSlot, Segment, Token};
use crate::core::weighted::choose_weighted;
use crate::schema::biome::{Biome, RoomArchetype, RoomSize};
use crate::schema::fragment::Fragment;
use crate::schema::modifier::BiomeModifier;
use crate::schema::room_function::RoomFunction;
use crate::schema::template::BaseTemplate;

/// A fully composed room, ready for a dungeon generator to attach to a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomDescription {
    pub name: String,
    pub description: String,
    pub effect_tags: Vec<String>,
    pub template_id: String,
    pub archetype: RoomArchetype,
    pub size: RoomSize,
    pub biome: Biome,
    pub function_name: Option<String>,
    pub min_exits: u32,
    pub max_exits: u32,
    pub spawn_budget_multiplier: f64,
}

/// Stateless compositor over a shared repository.
#[derive(Debug, Clone)]
pub struct RoomDescriptorService {
    repository: Arc<DescriptorRepository>,
}

impl RoomDescriptorService {
    pub fn new(repository: Arc<DescriptorRepository>) -> Self {
        Self { repository }
    }

    /// Service over the built-in catalog.
    pub fn builtin() -> Result<Self, RepositoryError> {
        Ok(Self::new(Arc::new(DescriptorRepository::builtin()?)))
    }

    pub fn repository(&self) -> &Arc<DescriptorRepository> {
        &self.repository
    }

    /// Resolve the template's name token string.
    ///
    /// `{Function}` becomes the function's name, or nothing when no
    /// function is given.
    ///
    /// # Panics
    ///
    /// If the name uses a fragment slot or `{Modifier_Detail}`, or the result
    /// does not start with "The " or still contains a brace.
    pub fn generate_room_name(
        &self,
        template: &BaseTemplate,
        modifier: &BiomeModifier,
        function: Option<&RoomFunction>,
    ) -> String {
        let pieces: Vec<Piece> = template
            .name
            .segments()
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => Piece::Text(text.clone()),
                Segment::Token(token) => match token {
                    Token::Modifier => Piece::Text(modifier.name.clone()),
                    Token::ModifierAdj => Piece::Text(modifier.adjective.clone()),
                    Token::Function => {
                        Piece::Text(function.map(|f| f.name.clone()).unwrap_or_default())
                    }
                    Token::Article => Piece::Article { capitalized: false },
                    Token::ArticleCap => Piece::Article { capitalized: true },
                    Token::ModifierDetail | Token::Slot(_) => {
                        panic!("template '{}' uses {token} in its name", template.id)
                    }
                },
            })
            .collect();

        let name = tidy(&resolve_articles(&pieces));
        assert!(
            !has_unresolved_braces(&name),
            "template '{}' produced a name with a brace: {name}",
            template.id
        );
        assert!(
            name.starts_with("The "),
            "template '{}' produced a name without a leading \"The \": {name}",
            template.id
        );
        name
    }

    /// Resolve the template's description token string, drawing fragments
    /// for the modifier's biome from `rng`.
    ///
    /// `tags` are accepted for narrative gating and currently do not affect
    /// the output.
    ///
    /// # Panics
    ///
    /// If a fragment slot has no candidates or a brace survives.
    pub fn generate_room_description<R: Rng + ?Sized>(
        &self,
        template: &BaseTemplate,
        modifier: &BiomeModifier,
        tags: &[&str],
        rng: &mut R,
        function: Option<&RoomFunction>,
    ) -> String {
        self.describe(template, modifier, modifier.biome, tags, rng, function)
    }

    /// Pick a template for `archetype`, resolve the biome's modifier and
    /// compose the room. `None` when no template exists for the archetype.
    pub fn generate_room<R: Rng + ?Sized>(
        &self,
        archetype: RoomArchetype,
        biome: Biome,
        tags: &[&str],
        rng: &mut R,
        function: Option<&RoomFunction>,
    ) -> Option<RoomDescription> {
        let template = self.repository.choose_base_template(archetype, rng)?;
        let modifier = self.repository.modifier(biome);
        let name = self.generate_room_name(template, modifier, function);
        let description = self.describe(template, modifier, biome, tags, rng, function);

        Some(RoomDescription {
            name,
            description,
            effect_tags: modifier.effect_tags(),
            template_id: template.id.clone(),
            archetype,
            size: template.size,
            biome,
            function_name: function.map(|f| f.name.clone()),
            min_exits: template.min_exits,
            max_exits: template.max_exits,
            spawn_budget_multiplier: template.spawn_budget_multiplier,
        })
    }

    fn describe<R: Rng + ?Sized>(
        &self,
        template: &BaseTemplate,
        modifier: &BiomeModifier,
        biome: Biome,
        _tags: &[&str],
        rng: &mut R,
        function: Option<&RoomFunction>,
    ) -> String {
        let mut draws: Vec<(FragmentSlot, &Fragment)> = Vec::new();
        let mut pieces = Vec::with_capacity(template.description.segments().len());

        for segment in template.description.segments() {
            let piece = match segment {
                Segment::Literal(text) => Piece::Text(text.clone()),
                Segment::Token(Token::Modifier) => Piece::Text(modifier.name.clone()),
                Segment::Token(Token::ModifierAdj) => Piece::Text(modifier.adjective.clone()),
                Segment::Token(Token::ModifierDetail) => {
                    Piece::Text(modifier.detail_fragment.clone())
                }
                Segment::Token(Token::Function) => Piece::Text(
                    function
                        .map(|f| f.detail_sentence.clone())
                        .unwrap_or_default(),
                ),
                Segment::Token(Token::Article) => Piece::Article { capitalized: false },
                Segment::Token(Token::ArticleCap) => Piece::Article { capitalized: true },
                Segment::Token(Token::Slot(slot)) => {
                    let earlier = draws.iter().find(|(s, _)| s == slot).map(|(_, f)| *f);
                    let fragment = match earlier {
                        Some(fragment) => fragment,
                        None => {
                            let fragment = self.draw(template, *slot, biome, &draws, rng);
                            draws.push((*slot, fragment));
                            fragment
                        }
                    };
                    Piece::Text(fragment.text.clone())
                }
            };
            pieces.push(piece);
        }

        let description = tidy(&resolve_articles(&pieces));
        assert!(
            !has_unresolved_braces(&description),
            "template '{}' produced a description with a brace: {description}",
            template.id
        );
        description
    }

    /// Weighted draw for one slot. The two detail slots never share a
    /// fragment while the pool offers an alternative.
    fn draw<'r, R: Rng + ?Sized>(
        &'r self,
        template: &BaseTemplate,
        slot: FragmentSlot,
        biome: Biome,
        earlier: &[(FragmentSlot, &Fragment)],
        rng: &mut R,
    ) -> &'r Fragment {
        let category = slot.category();
        let mut pool = self.repository.fragments(category, Some(biome));

        let sibling = match slot {
            FragmentSlot::Detail1 => Some(FragmentSlot::Detail2),
            FragmentSlot::Detail2 => Some(FragmentSlot::Detail1),
            _ => None,
        };
        if let Some((_, taken)) = sibling.and_then(|s| earlier.iter().find(|(e, _)| *e == s)) {
            if pool.len() > 1 {
                pool.retain(|f| !std::ptr::eq(*f, *taken));
            }
        }

        let fragment = choose_weighted(&pool, |f| f.weight, rng)
            .copied()
            .unwrap_or_else(|| {
                panic!(
                    "template '{}': no {category:?} fragment available for {biome}",
                    template.id
                )
            });
        log::trace!("{}: {slot:?} <- {:?}", template.id, fragment.text);
        fragment
    }
}
