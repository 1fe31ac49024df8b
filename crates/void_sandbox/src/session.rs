//! One authority and one replica sharing a player, an inventory and a loot
//! pouch.
//!
//! Every tick both simulations advance, requests queued by the replica are
//! handed to the authority and the authority's inventory is replicated back.

use crate::config::{Result, SandboxConfig, SandboxError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use void_core::{EntityId, NetRole, Revision};
use void_interaction::prelude::*;
use void_inventory::prelude::*;
use void_replication::{PeerId, ReplicationHub};

const PLAYER: EntityId = EntityId::new(1);
const LOOT: EntityId = EntityId::new(100);
const CLIENT: PeerId = PeerId(1);

/// Tick on which the client presses interact
const INTERACT_TICK: u32 = 1;

/// Built-in item catalog
const DEFAULT_CATALOG: &str = include_str!("../items.json");

/// Final state of a session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub ticks: u32,
    /// Completed interactions on the authority
    pub interactions: usize,
    /// Units of the loot kind held by the authority
    pub server_count: u32,
    /// Units of the loot kind mirrored on the replica
    pub client_count: u32,
    pub server_revision: Revision,
    pub client_revision: Revision,
    /// Units left in the loot pouch
    pub pickup_left: u32,
    /// Units dropped back into the world
    pub dropped: u32,
}

impl SessionReport {
    /// Whether the replica ended up mirroring the authority
    pub fn in_sync(&self) -> bool {
        self.server_count == self.client_count && self.server_revision == self.client_revision
    }

    /// Log a summary
    pub fn log_summary(&self) {
        log::info!("Session finished after {} ticks", self.ticks);
        log::info!("  Interactions:    {}", self.interactions);
        log::info!("  Server holds:    {} (rev {})", self.server_count, self.server_revision);
        log::info!("  Client mirrors:  {} (rev {})", self.client_count, self.client_revision);
        log::info!("  Left in pouch:   {}", self.pickup_left);
        log::info!("  Dropped:         {}", self.dropped);
        if self.in_sync() {
            log::info!("  Replica in sync");
        } else {
            log::warn!("  Replica out of sync");
        }
    }
}

/// Sandbox session
pub struct Session {
    config: SandboxConfig,
    loot_kind: ItemKind,
    world: SphereWorld,
    hub: Arc<ReplicationHub>,
    server: InteractionSystem,
    client: InteractionSystem,
    server_inventory: Arc<Mutex<InventoryStore>>,
    client_inventory: Arc<Mutex<InventoryStore>>,
    server_pickup: Arc<Mutex<Pickup>>,
    server_events: Arc<Mutex<Vec<InteractionEvent>>>,
}

impl Session {
    /// Build both simulations from the configuration
    pub fn new(config: SandboxConfig) -> Result<Self> {
        let catalog = Arc::new(load_catalog(&config)?);
        let loot_kind = ItemKind::new(config.loot.kind.clone());
        if !catalog.contains(&loot_kind) {
            log::warn!("Loot kind {} is not in the item catalog", loot_kind);
        }

        let hub = Arc::new(ReplicationHub::new());
        hub.connect(CLIENT);

        let mut server_store = InventoryStore::new(PLAYER, NetRole::Authority, config.inventory.clone(), catalog.clone())
            .with_bridge(hub.clone());
        server_store.add_observer(CLIENT);

        let mut client_store = InventoryStore::new(PLAYER, NetRole::Replica, config.inventory.clone(), catalog);
        client_store.subscribe(|event| log::debug!("Client inventory: {:?}", event));

        let server_inventory = Arc::new(Mutex::new(server_store));
        let client_inventory = Arc::new(Mutex::new(client_store));

        let loot = &config.loot;
        let pouch = || {
            Pickup::new(loot_kind.clone(), loot.quantity)
                .with_position(loot.position)
                .with_radius(loot.radius)
        };
        let server_pickup = Arc::new(Mutex::new(pouch()));
        let client_pickup = Arc::new(Mutex::new(pouch()));

        let mut world = SphereWorld::new();
        world.insert(LOOT, loot.position, loot.radius);

        let server_events = Arc::new(Mutex::new(Vec::new()));
        let mut server_target = loot_target(&config, server_pickup.clone(), server_inventory.clone());
        let sink = server_events.clone();
        server_target.subscribe(move |event| sink.lock().push(*event));

        let mut server = InteractionSystem::new(NetRole::Authority);
        server.spawn_target(server_target);
        server.add_tracker(PLAYER, config.tracker.clone());

        let mut client = InteractionSystem::new(NetRole::Replica);
        client.spawn_target(loot_target(&config, client_pickup, client_inventory.clone()));
        client.add_tracker(PLAYER, config.tracker.clone());

        Ok(Self {
            config,
            loot_kind,
            world,
            hub,
            server,
            client,
            server_inventory,
            client_inventory,
            server_pickup,
            server_events,
        })
    }

    /// Run every tick, then release interact and drop part of the loot
    pub fn run(mut self) -> Result<SessionReport> {
        let aim = Aim::at([0.0; 3], self.config.loot.position);
        let aims: HashMap<EntityId, Aim> = [(PLAYER, aim)].into_iter().collect();
        let ticks = self.config.session.ticks;

        for tick in 0..ticks {
            let now = f64::from(tick) * self.config.session.tick_seconds;
            self.server.update(now, &self.world, &aims);
            self.client.update(now, &self.world, &aims);

            if tick == INTERACT_TICK {
                if let Err(err) = self.client.begin_interaction(PLAYER, aim, &self.world) {
                    log::warn!("Client could not start interacting: {}", err);
                }
            }

            self.forward_interaction_requests();
            self.retire_depleted_loot();
            self.sync()?;
        }

        if let Err(err) = self.client.end_interaction(PLAYER) {
            log::warn!("Client could not stop interacting: {}", err);
        }
        self.forward_interaction_requests();

        let dropped = self.drop_loot(self.config.session.drop_quantity);
        self.sync()?;

        let server = self.server_inventory.lock();
        let client = self.client_inventory.lock();
        let interactions = self
            .server_events
            .lock()
            .iter()
            .filter(|event| matches!(event, InteractionEvent::Interact { .. }))
            .count();

        Ok(SessionReport {
            ticks,
            interactions,
            server_count: server.count_of(&self.loot_kind),
            client_count: client.count_of(&self.loot_kind),
            server_revision: server.revision(),
            client_revision: client.revision(),
            pickup_left: self.server_pickup.lock().quantity,
            dropped,
        })
    }

    fn forward_interaction_requests(&mut self) {
        for (owner, request) in self.client.take_requests() {
            log::debug!("{} -> server: {:?}", owner, request);
            if let Err(err) = self.server.handle_request(owner, request, &self.world) {
                log::warn!("Server rejected interaction request from {}: {}", owner, err);
            }
        }
    }

    /// Once the authority's pouch is empty the object leaves both worlds
    fn retire_depleted_loot(&mut self) {
        let active = self.server.target(LOOT).map_or(false, |target| target.is_active());
        if !active || !self.server_pickup.lock().is_depleted() {
            return;
        }
        self.server.deactivate_target(LOOT);
        self.client.deactivate_target(LOOT);
        self.world.remove(LOOT);
        log::info!("Loot {} depleted", LOOT);
    }

    /// Ask the authority, via the replica, to drop units of the loot kind
    fn drop_loot(&mut self, quantity: u32) -> u32 {
        if quantity == 0 {
            return 0;
        }
        let held = self
            .client_inventory
            .lock()
            .find_item(&self.loot_kind)
            .map(|item| item.id());
        let Some(item) = held else {
            log::info!("Nothing to drop");
            return 0;
        };

        self.client_inventory.lock().drop_item(item, quantity);
        let requests = self.client_inventory.lock().take_requests();

        let mut dropped = 0;
        for request in requests {
            match self.server_inventory.lock().handle_request(request) {
                RequestOutcome::Dropped(pickup) => {
                    log::info!("Dropped {} x{}", pickup.kind, pickup.quantity);
                    dropped += pickup.quantity;
                }
                RequestOutcome::Rejected(err) => log::warn!("Drop rejected: {}", err),
                RequestOutcome::Used => {}
            }
        }
        dropped
    }

    fn sync(&mut self) -> Result<()> {
        let sent = self.server_inventory.lock().replicate()?;
        if sent > 0 {
            log::debug!("Replicated inventory of {} to {} peer(s)", PLAYER, sent);
        }
        for message in self.hub.drain(CLIENT) {
            self.client_inventory.lock().receive(&message)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("loot_kind", &self.loot_kind)
            .field("server", &self.server)
            .field("client", &self.client)
            .finish()
    }
}

fn load_catalog(config: &SandboxConfig) -> Result<ItemCatalog> {
    let Some(path) = &config.catalog else {
        return Ok(ItemCatalog::from_json(DEFAULT_CATALOG)?);
    };
    log::info!("Loading item catalog from {}", path);
    let json = std::fs::read_to_string(path).map_err(|source| SandboxError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(ItemCatalog::from_json(&json)?)
}

/// A target whose completed interaction moves the pouch into `inventory`
fn loot_target(
    config: &SandboxConfig,
    pickup: Arc<Mutex<Pickup>>,
    inventory: Arc<Mutex<InventoryStore>>,
) -> InteractionTarget {
    let mut target = InteractionTarget::new(LOOT, config.target.clone());
    target.subscribe(move |event| {
        if let InteractionEvent::Interact { interactor, .. } = event {
            let mut store = inventory.lock();
            let result = pickup.lock().collect_into(&mut store);
            if let Some(err) = &result.reason {
                log::debug!("{} could not take everything: {}", interactor, err);
            }
        }
    });
    target
}
