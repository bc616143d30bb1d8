//! Static upgrade catalog.
//!
//! The catalog is an immutable, injected configuration: the engine never
//! reads item data from anywhere else, so tests can run against synthetic
//! catalogs. Items come in four pools — planets (Local), nebulae (Mid),
//! cosmic structures (Top) and the two global amplifiers — each with its
//! own cost curve steepness.

/// Display pool an item belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// Planets: cheap, early-game boosts.
    Local,
    /// Nebulae: mid-game boosts.
    Mid,
    /// Cosmic structures: end-game boosts.
    Top,
    /// Global amplifiers: small uncapped multipliers.
    Amplifier,
}

impl Tier {
    /// Cost growth per level. Planets grow gently (1.5x); everything else
    /// doubles, so each pool stays relevant for a bounded level range.
    pub fn cost_growth(&self) -> f64 {
        match self {
            Tier::Local => 1.5,
            Tier::Mid | Tier::Top | Tier::Amplifier => 2.0,
        }
    }

    /// Which level-cap pool this tier draws from. Cosmic structures share
    /// the nebula pool; amplifiers are never tier-capped.
    pub fn cap_pool(&self) -> Option<CapPool> {
        match self {
            Tier::Local => Some(CapPool::Local),
            Tier::Mid | Tier::Top => Some(CapPool::Mid),
            Tier::Amplifier => None,
        }
    }
}

/// The two independently tracked level-cap pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapPool {
    Local,
    Mid,
}

/// Base purchasable levels per pool before any cap expanders.
pub const TIER_BASE_CAP: u32 = 10;
/// Cap increase granted per cap-expander level.
pub const CAP_STEP: u32 = 3;

/// What buying one level of an item does. Closed set: adding a kind without
/// handling it everywhere is a compile error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectKind {
    /// `per_action_yield *= magnitude` per level, applied at purchase.
    FlatYieldMultiplier,
    /// Per-click multiplier `magnitude^level`, computed on demand.
    ClickBonus,
    /// `auto_rate += 1` per level.
    AutoRateUnit,
    /// Auto-generation multiplier `magnitude^level`, computed on demand.
    AutoBonus,
    /// `critical_chance += magnitude` per level, clamped.
    CriticalChanceBonus,
    /// `critical_yield_factor *= magnitude` per level, clamped.
    CriticalYieldBonus,
    /// Contributes `magnitude^level` to the global multiplier; never stored.
    TierWideMultiplier,
    /// Contributes `magnitude^level` (≤ 1) to the cost reduction factor.
    CostReduction,
    /// Raises the owning pool's level cap by `CAP_STEP` per level.
    LevelCapExpander,
}

/// How an item's purchasable levels are bounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelCap {
    /// Bounded by the tier pool cap (base + expander bonus).
    Tier,
    /// Item-specific fixed cap (cap expanders themselves).
    Fixed(u32),
    /// No cap.
    Unbounded,
}

/// One purchasable upgrade.
#[derive(Clone, Debug)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub base_cost: f64,
    pub cost_growth: f64,
    pub effect: EffectKind,
    pub magnitude: f64,
    pub level_cap: LevelCap,
}

/// The full, ordered item table.
#[derive(Clone, Debug)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Sanity-check the table: unique ids, growing costs, reductions that
    /// actually reduce. Returns the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        for (idx, item) in self.items.iter().enumerate() {
            if self.items[..idx].iter().any(|other| other.id == item.id) {
                return Err(format!("duplicate item id: {}", item.id));
            }
            if item.cost_growth <= 1.0 {
                return Err(format!("{}: cost growth must exceed 1", item.id));
            }
            if item.base_cost <= 0.0 {
                return Err(format!("{}: base cost must be positive", item.id));
            }
            match item.effect {
                EffectKind::CostReduction if item.magnitude > 1.0 => {
                    return Err(format!("{}: cost reduction must be ≤ 1", item.id));
                }
                EffectKind::LevelCapExpander if item.level_cap == LevelCap::Tier => {
                    return Err(format!("{}: cap expander needs its own cap", item.id));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// The standard game catalog.
    pub fn standard() -> Self {
        use EffectKind::*;
        use Tier::*;

        fn item(
            id: &str,
            name: &str,
            tier: Tier,
            base_cost: f64,
            effect: EffectKind,
            magnitude: f64,
        ) -> CatalogItem {
            CatalogItem {
                id: id.into(),
                name: name.into(),
                tier,
                base_cost,
                cost_growth: tier.cost_growth(),
                effect,
                magnitude,
                level_cap: LevelCap::Tier,
            }
        }

        fn expander(id: &str, name: &str, tier: Tier, base_cost: f64) -> CatalogItem {
            CatalogItem {
                level_cap: LevelCap::Fixed(5),
                ..item(id, name, tier, base_cost, LevelCapExpander, 0.0)
            }
        }

        fn unbounded(ci: CatalogItem) -> CatalogItem {
            CatalogItem {
                level_cap: LevelCap::Unbounded,
                ..ci
            }
        }

        let items = vec![
            // ── Planets ─────────────────────────────────────────────
            item("mercury", "Mercury", Local, 75.0, FlatYieldMultiplier, 1.2),
            item("venus", "Venus", Local, 500.0, TierWideMultiplier, 1.5),
            item("earth", "Earth", Local, 2_500.0, AutoRateUnit, 1.0),
            item("mars", "Mars", Local, 6_000.0, CriticalChanceBonus, 0.05),
            item("jupiter", "Jupiter", Local, 25_000.0, TierWideMultiplier, 1.3),
            item("saturn", "Saturn", Local, 75_000.0, AutoBonus, 1.4),
            item("uranus", "Uranus", Local, 250_000.0, TierWideMultiplier, 1.5),
            item("neptune", "Neptune", Local, 1e6, TierWideMultiplier, 2.0),
            expander("planetcap", "Planet Cap Amplifier", Local, 1e12),
            expander("planetcap2", "Planet Cap Amplifier II", Local, 1e33),
            // ── Nebulae ─────────────────────────────────────────────
            item("orion", "Orion Nebula", Mid, 1e14, ClickBonus, 1.5),
            item("crab", "Crab Nebula", Mid, 5e14, AutoBonus, 2.0),
            item("eagle", "Eagle Nebula", Mid, 2e15, CriticalYieldBonus, 1.25),
            item("horsehead", "Horsehead Nebula", Mid, 1e14, CostReduction, 0.8),
            item("helix", "Helix Nebula", Mid, 5e15, TierWideMultiplier, 1.25),
            item("pillars", "Pillars Nebula", Mid, 2e16, TierWideMultiplier, 1.5),
            item("tarantula", "Tarantula Nebula", Mid, 3e14, AutoBonus, 1.4),
            item("carina", "Carina Nebula", Mid, 5e14, ClickBonus, 1.6),
            item("rosette", "Rosette Nebula", Mid, 8e14, TierWideMultiplier, 1.2),
            item("trifid", "Trifid Nebula", Mid, 1.2e15, TierWideMultiplier, 1.3),
            item("lagoon", "Lagoon Nebula", Mid, 1.6e15, ClickBonus, 1.3),
            item("omega", "Omega Nebula", Mid, 2.4e15, TierWideMultiplier, 1.2),
            item("catseye", "Cat's Eye Nebula", Mid, 4e15, CriticalYieldBonus, 1.2),
            item("ringnebula", "Ring Nebula", Mid, 6e15, CostReduction, 0.95),
            item("northamerica", "North America Nebula", Mid, 8e15, TierWideMultiplier, 1.4),
            item("veil", "Veil Nebula", Mid, 1e16, AutoBonus, 1.5),
            expander("nebulacap", "Nebula Cap Amplifier", Mid, 5e14),
            expander("nebulacap2", "Nebula Cap Amplifier II", Mid, 1e45),
            expander("nebulacap3", "Nebula Cap Amplifier III", Mid, 1e63),
            // ── Cosmic structures ───────────────────────────────────
            item("milkyway", "Milky Way", Top, 1e93, TierWideMultiplier, 5.0),
            item("andromeda", "Andromeda", Top, 1.2e93, ClickBonus, 5.0),
            item("virgo", "Virgo Cluster", Top, 1.5e93, AutoBonus, 5.0),
            item("laniakea", "Laniakea Supercluster", Top, 2.0e93, TierWideMultiplier, 10.0),
            item("quasar", "Quasar", Top, 1.8e93, CriticalYieldBonus, 5.0),
            item("pulsar", "Pulsar", Top, 1.6e93, AutoBonus, 5.0),
            item("neutronstar", "Neutron Star", Top, 1.4e93, ClickBonus, 5.0),
            item("supernova", "Supernova", Top, 2.5e93, TierWideMultiplier, 5.0),
            item("cmb", "Cosmic Microwave Background", Top, 3.0e93, TierWideMultiplier, 10.0),
            item("darkmatter", "Dark Matter", Top, 2.2e93, CostReduction, 0.9),
            item("darkenergy", "Dark Energy", Top, 3.5e93, TierWideMultiplier, 5.0),
            item("cosmicweb", "Cosmic Web", Top, 2.8e93, TierWideMultiplier, 5.0),
            item("starcluster", "Open Cluster", Top, 1.3e93, AutoBonus, 5.0),
            item("globular", "Globular Cluster", Top, 1.7e93, ClickBonus, 5.0),
            item("gascloud", "Molecular Cloud", Top, 1.9e93, TierWideMultiplier, 5.0),
            item("blackhole", "Black Hole", Top, 2.4e93, CriticalYieldBonus, 5.0),
            item("protostar", "Protostar", Top, 1.1e93, ClickBonus, 5.0),
            item("megamaser", "Megamaser", Top, 2.1e93, AutoBonus, 5.0),
            item("hypernova", "Hypernova", Top, 4.0e93, TierWideMultiplier, 10.0),
            item("exoplanet", "Exoplanet", Top, 1.25e93, ClickBonus, 5.0),
            item("ringgalaxy", "Ring Galaxy", Top, 2.6e93, TierWideMultiplier, 5.0),
            item("supercluster", "Supercluster", Top, 3.2e93, TierWideMultiplier, 5.0),
            item("cosmicstring", "Cosmic String", Top, 2.3e93, CostReduction, 0.92),
            item("sloanwall", "Sloan Great Wall", Top, 5.0e93, TierWideMultiplier, 10.0),
            item("greatattractor", "Great Attractor", Top, 8.0e93, TierWideMultiplier, 5.0),
            item("bootesvoid", "Boötes Void", Top, 1.2e94, TierWideMultiplier, 5.0),
            unbounded(item("observable", "Observable Universe", Top, 1.0e95, TierWideMultiplier, 10.0)),
            // ── Global amplifiers ───────────────────────────────────
            unbounded(item("amplifier", "Global Amplifier", Amplifier, 1e6, TierWideMultiplier, 1.2)),
            unbounded(item("auto_amplifier", "Auto Amplifier", Amplifier, 1e8, AutoBonus, 1.2)),
        ];

        Self { items }
    }
}
