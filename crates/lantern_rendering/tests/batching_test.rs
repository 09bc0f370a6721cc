//! # Batching Tests
//!
//! Culling, lightmap refresh and the chain renderers, checked against the
//! commands a recording backend receives.

mod common;

use common::{image, lightmap_set, lightmaps, texture, view, TestMap, SAMPLER};
use lantern_core::{
    Contents, DescriptorSet, LeafId, Plane, SubModel, SurfaceFlags, SurfaceId, TextureAnimation,
    TextureBinding, TextureId, WorldModel,
};
use lantern_rendering::{
    BackendCommand, ChainId, DescriptorSlot, DrawMode, DynamicLightmaps, EntityState, Frustum,
    LightmapCache, NoFragments, NoWarp, PipelineKind, RecordingBackend, RenderStats,
    RendererConfig, ViewState, WarpRefresher, WorldRenderer,
};

#[derive(Default)]
struct WarpLog(Vec<TextureId>);

impl WarpRefresher for WarpLog {
    fn refresh_warp(&mut self, texture: TextureId) {
        self.0.push(texture);
    }
}

fn frame(
    world: &WorldModel,
    config: RendererConfig,
    view: &ViewState,
) -> (RecordingBackend, RenderStats) {
    let mut renderer = WorldRenderer::new(config, world).unwrap();
    let mut backend = RecordingBackend::new();
    let mut lightmaps = lightmaps(world);
    let stats = renderer
        .render_frame(
            world,
            view,
            &mut NoFragments,
            &mut backend,
            &mut lightmaps,
            &mut NoWarp,
        )
        .unwrap();
    (backend, stats)
}

/// Test: two textures, one draw each, sized `3 * (E - 2)` per surface.
#[test]
fn test_one_draw_per_texture_and_lightmap() {
    let mut map = TestMap::new(3);
    let a = [
        map.surface(0, 6, 0),
        map.surface(0, 4, 0),
        map.surface(0, 8, 0),
    ];
    let b = map.surface(1, 5, 1);
    let mut all = a.to_vec();
    all.push(b);
    map.leaf(Contents::Empty, &all);
    let world = map.build();

    let (backend, stats) = frame(&world, RendererConfig::default(), &view(0));

    assert_eq!(backend.draw_counts(), vec![36, 9]);
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.indices_submitted, 45);
    assert_eq!(stats.brush_polys, 4);
    assert_eq!(stats.brush_passes, 4);
    assert_eq!(backend.pipelines(), vec![PipelineKind::World]);
    assert_eq!(backend.descriptors(DescriptorSlot::Texture), vec![image(0), image(1)]);
    assert_eq!(
        backend.descriptors(DescriptorSlot::Lightmap),
        vec![lightmap_set(0), lightmap_set(1)]
    );
}

/// Test: a lightmap change inside a chain splits it into two draws at the
/// transition.
#[test]
fn test_lightmap_change_forces_one_flush() {
    let mut map = TestMap::new(1);
    // Chained in reverse: lightmap 1, 1, then 0, 0.
    let surfaces = [
        map.surface(0, 4, 0),
        map.surface(0, 4, 0),
        map.surface(0, 5, 1),
        map.surface(0, 5, 1),
    ];
    map.leaf(Contents::Empty, &surfaces);
    let world = map.build();

    let (backend, _) = frame(&world, RendererConfig::default(), &view(0));

    assert_eq!(backend.draw_counts(), vec![18, 12]);
    assert_eq!(
        backend.descriptors(DescriptorSlot::Lightmap),
        vec![lightmap_set(1), lightmap_set(0)]
    );
    // The lightmap is rebound after the flush, never mid-batch.
    let commands = backend.commands();
    let rebind = commands
        .iter()
        .position(|c| *c == BackendCommand::BindDescriptorSet(DescriptorSlot::Lightmap, lightmap_set(0)))
        .unwrap();
    assert_eq!(commands[rebind - 1], BackendCommand::DrawIndexed(18));
}

/// Test: a full batch flushes early and the batch never overflows.
#[test]
fn test_capacity_flushes_early() {
    let mut map = TestMap::new(1);
    let surfaces: Vec<_> = (0..3).map(|_| map.surface(0, 4, 0)).collect();
    map.leaf(Contents::Empty, &surfaces);
    let world = map.build();
    let config = RendererConfig {
        max_batch_indices: 12,
        ..RendererConfig::default()
    };

    let (backend, stats) = frame(&world, config, &view(0));
    assert_eq!(backend.draw_counts(), vec![12, 6]);
    assert!(backend.draw_counts().iter().all(|&n| n <= 12));
    assert_eq!(stats.indices_submitted, 18);
    // Still one texture bind: a capacity flush is not a state change.
    assert_eq!(backend.descriptors(DescriptorSlot::Texture).len(), 1);
}

/// Test: a texture whose surfaces are all culled binds nothing.
#[test]
fn test_fully_culled_texture_binds_nothing() {
    let mut map = TestMap::new(2);
    let hidden = map.surface_with(0, 4, 0, SurfaceFlags::PLANE_BACK);
    let shown = map.surface(1, 4, 0);
    map.leaf(Contents::Empty, &[hidden, shown]);
    let world = map.build();

    let (backend, stats) = frame(&world, RendererConfig::default(), &view(0));
    assert_eq!(backend.descriptors(DescriptorSlot::Texture), vec![image(1)]);
    assert_eq!(backend.draw_counts(), vec![6]);
    assert_eq!(stats.brush_polys, 1);
    assert_eq!(stats.pipeline_binds, 1);
}

/// Test: back-facing from behind, inverted by `PLANE_BACK`.
#[test]
fn test_back_face_symmetry() {
    let mut map = TestMap::new(1);
    let front = map.surface(0, 4, 0);
    let flipped = map.surface_with(0, 4, 0, SurfaceFlags::PLANE_BACK);
    map.leaf(Contents::Empty, &[front, flipped]);
    let world = map.build();
    let mut renderer = WorldRenderer::new(RendererConfig::default(), &world).unwrap();

    let behind = ViewState::new(LeafId(0), [-64.0, 0.0, 0.0]);
    renderer.mark_surfaces(&world, &behind, &mut NoFragments).unwrap();
    renderer.cull_surfaces(&world, &behind).unwrap();
    assert!(renderer.frame().is_culled(front));
    assert!(!renderer.frame().is_culled(flipped));

    let ahead = view(0);
    renderer.cull_surfaces(&world, &ahead).unwrap();
    assert!(!renderer.frame().is_culled(front));
    assert!(renderer.frame().is_culled(flipped));
}

/// Test: culling twice with the same inputs gives the same flags.
#[test]
fn test_culling_is_repeatable() {
    let mut map = TestMap::new(2);
    let mut surfaces = Vec::new();
    for i in 0..8 {
        let flags = if i % 3 == 0 {
            SurfaceFlags::PLANE_BACK
        } else {
            SurfaceFlags::empty()
        };
        surfaces.push(map.surface_with(i % 2, 4, 0, flags));
    }
    map.leaf(Contents::Empty, &surfaces);
    let world = map.build();
    let mut renderer = WorldRenderer::new(RendererConfig::default(), &world).unwrap();
    let view = view(0);

    renderer.mark_surfaces(&world, &view, &mut NoFragments).unwrap();
    renderer.cull_surfaces(&world, &view).unwrap();
    let first: Vec<_> = surfaces.iter().map(|&s| renderer.frame().is_culled(s)).collect();
    renderer.cull_surfaces(&world, &view).unwrap();
    let second: Vec<_> = surfaces.iter().map(|&s| renderer.frame().is_culled(s)).collect();

    assert_eq!(first, second);
    assert_eq!(first.iter().filter(|&&c| c).count(), 3);
}

/// Test: boxes outside the frustum are culled.
#[test]
fn test_frustum_culls_boxes() {
    let mut map = TestMap::new(1);
    let s = map.surface(0, 4, 0);
    map.leaf(Contents::Empty, &[s]);
    let world = map.build();

    // Only y >= 100 is inside.
    let sides = [Plane::new(0.0, 1.0, 0.0, -100.0); 4];
    let view = view(0).with_frustum(Frustum::from_side_planes(sides));
    let (backend, stats) = frame(&world, RendererConfig::default(), &view);
    assert!(backend.commands().is_empty());
    assert_eq!(stats.brush_polys, 0);
}

/// Test: stale lightmaps are rebuilt before drawing and uploaded once.
#[test]
fn test_stale_lightmaps_rebuilt_before_draw() {
    let mut map = TestMap::new(1);
    let surfaces: Vec<_> = (0..3).map(|i| map.surface(0, 4, i % 2)).collect();
    let culled = map.surface_with(0, 4, 0, SurfaceFlags::PLANE_BACK);
    let mut all = surfaces.clone();
    all.push(culled);
    map.leaf(Contents::Empty, &all);
    let world = map.build();

    let mut renderer = WorldRenderer::new(RendererConfig::default(), &world).unwrap();
    let mut backend = RecordingBackend::new();
    let mut cache = lightmaps(&world);
    cache.invalidate_all();

    let stats = renderer
        .render_frame(&world, &view(0), &mut NoFragments, &mut backend, &mut cache, &mut NoWarp)
        .unwrap();
    assert_eq!(stats.lightmaps_rebuilt, 3);
    assert_eq!(cache.uploads(), 1);
    assert_eq!(cache.pages_uploaded(), 2);
    for s in &surfaces {
        assert!(!cache.is_stale(*s));
    }
    // Culled surfaces keep their stale lightmap.
    assert!(cache.is_stale(culled));
    assert_eq!(renderer.frame().lightmap_chains().len(), 3);
}

/// Test: the fullbright pipeline is used only when enabled and present.
#[test]
fn test_fullbright_pipeline_selection() {
    let mut map = TestMap::new(2);
    map.textures[0] = Some(texture(0).with_fullbright(DescriptorSet(55)));
    let glowing = map.surface(0, 4, 0);
    let plain = map.surface(1, 4, 0);
    map.leaf(Contents::Empty, &[glowing, plain]);
    let world = map.build();

    let (backend, _) = frame(&world, RendererConfig::default(), &view(0));
    assert_eq!(
        backend.pipelines(),
        vec![PipelineKind::WorldFullbright, PipelineKind::World]
    );
    assert_eq!(
        backend.descriptors(DescriptorSlot::Fullbright),
        vec![DescriptorSet(55)]
    );

    let config = RendererConfig {
        fullbrights: false,
        ..RendererConfig::default()
    };
    let (backend, _) = frame(&world, config, &view(0));
    assert_eq!(backend.pipelines(), vec![PipelineKind::World]);
    assert!(backend.descriptors(DescriptorSlot::Fullbright).is_empty());
}

/// Test: fullbright mode adds the glow overlay only while fullbrights are on.
#[test]
fn test_fullbright_mode_glow_overlay() {
    let mut map = TestMap::new(1);
    map.textures[0] = Some(texture(0).with_fullbright(DescriptorSet(55)));
    let s = map.surface(0, 4, 0);
    map.leaf(Contents::Empty, &[s]);
    let world = map.build();

    let config = RendererConfig {
        draw_mode: DrawMode::Fullbright,
        ..RendererConfig::default()
    };
    let (backend, _) = frame(&world, config.clone(), &view(0));
    assert_eq!(
        backend.pipelines(),
        vec![PipelineKind::TextureOnly, PipelineKind::Glow]
    );

    let config = RendererConfig {
        fullbrights: false,
        ..config
    };
    let (backend, stats) = frame(&world, config, &view(0));
    assert_eq!(backend.pipelines(), vec![PipelineKind::TextureOnly]);
    assert!(backend.descriptors(DescriptorSlot::Fullbright).is_empty());
    assert_eq!(stats.draw_calls, 1);
}

/// Test: animated textures bind the current frame's image.
#[test]
fn test_animated_texture_binding() {
    let mut map = TestMap::new(3);
    map.textures[0] = Some(texture(0).with_animation(TextureAnimation {
        frames: vec![TextureId(0), TextureId(1), TextureId(2)],
        alternate: Vec::new(),
    }));
    let s = map.surface(0, 4, 0);
    map.leaf(Contents::Empty, &[s]);
    let world = map.build();

    let mut view = view(0);
    view.anim_tick = 5;
    let (backend, _) = frame(&world, RendererConfig::default(), &view);
    assert_eq!(backend.descriptors(DescriptorSlot::Texture), vec![image(2)]);
    assert_eq!(backend.descriptors(DescriptorSlot::Sampler), vec![SAMPLER]);
}

/// Test: liquids draw one surface per call with their blend level.
#[test]
fn test_water_draws_unbatched_with_alpha() {
    let mut map = TestMap::new(2);
    let warp = TextureBinding {
        sampler: SAMPLER,
        image: DescriptorSet(77),
    };
    map.textures[1] = Some(texture(1).with_warp(warp));
    let liquid = SurfaceFlags::LIQUID | SurfaceFlags::SLIME | SurfaceFlags::TILED;
    let pools = [map.surface_with(1, 4, 0, liquid), map.surface_with(1, 3, 0, liquid)];
    let wall = map.surface(0, 4, 0);
    map.leaf(Contents::Empty, &[pools[0], pools[1], wall]);
    let world = map.build();

    let mut config = RendererConfig::default();
    config.liquid.slime_alpha = 0.5;
    let (backend, _) = frame(&world, config, &view(0));

    // Wall first, then each pool on its own.
    assert_eq!(backend.draw_counts(), vec![6, 3, 6]);
    assert!(backend.pipelines().contains(&PipelineKind::Water));
    assert!(backend.descriptors(DescriptorSlot::Texture).contains(&DescriptorSet(77)));
    let alphas: Vec<_> = backend
        .commands()
        .iter()
        .filter_map(|c| match c {
            BackendCommand::BlendAlpha(a) => Some(*a),
            _ => None,
        })
        .collect();
    assert_eq!(alphas, vec![0.5, 1.0]);
}

/// Test: draw modes select their pass sets.
#[test]
fn test_draw_modes() {
    let mut map = TestMap::new(3);
    map.textures[0] = Some(texture(0).with_fullbright(DescriptorSet(55)));
    let lit = map.surface(0, 4, 0);
    let other = map.surface(1, 4, 1);
    let sky = map.surface_with(2, 4, 0, SurfaceFlags::SKY | SurfaceFlags::TILED);
    map.leaf(Contents::Empty, &[lit, other, sky]);
    let world = map.build();

    let mode = |draw_mode: DrawMode| RendererConfig {
        draw_mode,
        ..RendererConfig::default()
    };

    let (backend, _) = frame(&world, mode(DrawMode::Flat), &view(0));
    assert_eq!(backend.pipelines(), vec![PipelineKind::Flat]);
    assert_eq!(backend.draw_counts(), vec![6, 6, 6]);

    let (backend, _) = frame(&world, mode(DrawMode::Lightmap), &view(0));
    assert_eq!(
        backend.pipelines(),
        vec![PipelineKind::Lightmap, PipelineKind::White]
    );
    // Page 0 holds `lit`, page 1 holds `other`, the sky goes white.
    assert_eq!(backend.draw_counts(), vec![6, 6, 6]);

    let (backend, _) = frame(&world, mode(DrawMode::Fullbright), &view(0));
    assert_eq!(
        backend.pipelines(),
        vec![PipelineKind::TextureOnly, PipelineKind::Glow]
    );
    assert!(backend.descriptors(DescriptorSlot::Lightmap).is_empty());
}

/// Test: untextured chains go through their own pass in normal mode.
#[test]
fn test_no_texture_pass() {
    let mut map = TestMap::new(2);
    let missing = map.surface_with(0, 4, 0, SurfaceFlags::NO_TEXTURE);
    let wall = map.surface(1, 4, 0);
    map.leaf(Contents::Empty, &[missing, wall]);
    let world = map.build();

    let (backend, _) = frame(&world, RendererConfig::default(), &view(0));
    assert_eq!(
        backend.pipelines(),
        vec![PipelineKind::TextureOnly, PipelineKind::World]
    );
    assert_eq!(backend.draw_counts(), vec![6, 6]);
}

/// Test: empty texture slots and empty chains are skipped.
#[test]
fn test_missing_texture_slot_is_skipped() {
    let mut map = TestMap::new(2);
    let orphan = map.surface(0, 4, 0);
    let wall = map.surface(1, 4, 0);
    map.leaf(Contents::Empty, &[orphan, wall]);
    map.textures[0] = None;
    let world = map.build();

    let (backend, stats) = frame(&world, RendererConfig::default(), &view(0));
    assert_eq!(backend.draw_counts(), vec![6]);
    assert_eq!(stats.brush_polys, 1);
}

/// Test: the wireframe pass runs only when enabled.
#[test]
fn test_show_tris_overlay() {
    let mut map = TestMap::new(1);
    let s = map.surface(0, 5, 0);
    map.leaf(Contents::Empty, &[s]);
    let world = map.build();

    let config = RendererConfig {
        show_tris: true,
        ..RendererConfig::default()
    };
    let (backend, _) = frame(&world, config, &view(0));
    assert_eq!(
        backend.pipelines(),
        vec![PipelineKind::World, PipelineKind::ShowTris]
    );
    assert_eq!(backend.draw_counts(), vec![9, 9]);
}

/// Test: warp refreshes run once per texture; brush model water defers
/// its refresh to the next frame.
#[test]
fn test_warp_requests() {
    let mut map = TestMap::new(1);
    let warp = TextureBinding {
        sampler: SAMPLER,
        image: DescriptorSet(77),
    };
    map.textures[0] = Some(texture(0).with_warp(warp));
    let liquid = SurfaceFlags::LIQUID | SurfaceFlags::WATER | SurfaceFlags::TILED;
    let pools = [map.surface_with(0, 4, 0, liquid), map.surface_with(0, 4, 0, liquid)];
    let door = map.surface_with(0, 4, 0, liquid);
    map.leaf(Contents::Empty, &pools);
    map.world_surfaces = Some(2);
    map.submodels.push(SubModel {
        first_surface: door.0,
        num_surfaces: 1,
    });
    let world = map.build();

    let mut renderer = WorldRenderer::new(RendererConfig::default(), &world).unwrap();
    let mut backend = RecordingBackend::new();
    let mut cache = lightmaps(&world);
    let mut warps = WarpLog::default();

    renderer
        .render_frame(&world, &view(0), &mut NoFragments, &mut backend, &mut cache, &mut warps)
        .unwrap();
    assert_eq!(warps.0, vec![TextureId(0)]);

    // Brush model water: the refresh waits for the next frame.
    renderer.rebuild_submodel_chains(&world, 0, ChainId::Model).unwrap();
    renderer.cull_chain(&world, &view(0), ChainId::Model).unwrap();
    renderer
        .draw_texture_chains(
            &world,
            EntityState::default(),
            ChainId::Model,
            false,
            &mut backend,
            &mut cache,
            &mut warps,
        )
        .unwrap();
    renderer
        .draw_water_chains(&world, EntityState::default(), ChainId::Model, false, &mut backend)
        .unwrap();
    assert!(renderer.frame().warp_requests().is_deferred(TextureId(0)));

    warps.0.clear();
    renderer.begin_frame();
    assert!(renderer.frame().warp_requests().is_requested(TextureId(0)));
}

/// Test: a translucent brush model wraps its opaque passes in a blend.
#[test]
fn test_translucent_entity_blend() {
    let mut map = TestMap::new(1);
    let wall = map.surface(0, 4, 0);
    let door = map.surface(0, 4, 0);
    map.leaf(Contents::Empty, &[wall]);
    map.world_surfaces = Some(1);
    map.submodels.push(SubModel {
        first_surface: door.0,
        num_surfaces: 1,
    });
    let world = map.build();

    let mut renderer = WorldRenderer::new(RendererConfig::default(), &world).unwrap();
    let mut backend = RecordingBackend::new();
    let mut cache: DynamicLightmaps = lightmaps(&world);

    renderer.rebuild_submodel_chains(&world, 0, ChainId::Model).unwrap();
    renderer.cull_chain(&world, &view(0), ChainId::Model).unwrap();
    let entity = EntityState {
        alpha: Some(0.25),
        ..EntityState::default()
    };
    renderer
        .draw_texture_chains(
            &world,
            entity,
            ChainId::Model,
            false,
            &mut backend,
            &mut cache,
            &mut NoWarp,
        )
        .unwrap();

    let commands = backend.commands();
    assert_eq!(commands.first(), Some(&BackendCommand::BlendAlpha(0.25)));
    assert_eq!(commands.last(), Some(&BackendCommand::BlendAlpha(1.0)));
    assert_eq!(backend.draw_counts(), vec![6]);
    assert_eq!(backend.uploads()[0], &[4, 5, 6, 4, 6, 7]);
    assert!(!renderer.frame().is_culled(SurfaceId(1)));
}
