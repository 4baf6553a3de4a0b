//! Random walks of the photon mapper. A **PhotonTracer** walks light
//! paths from the emitters to fill the photon stores, and eye paths
//! from the camera to turn the stored photons into radiance. Every
//! worker thread owns its tracer, the query scratch space lives in it.

// std
use std::f32::consts::PI;
use std::sync::Arc;
// pbrt
use crate::core::camera::Camera;
use crate::core::geometry::{vec3_abs_dot_nrmf, vec3_dot_vec3f, Point2i, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::lightdistrib::LightDistribution;
use crate::core::medium::PhaseFunction;
use crate::core::pbrt::{Float, Spectrum, RAY_EPSILON};
use crate::core::primitive::{LightSample, Primitive};
use crate::core::reflection::{Bsdf, TransportMode};
use crate::core::sampler::Sampler;
use crate::core::sampling::power_heuristic;
use crate::core::scene::Scene;
use crate::integrators::photon_map::kdtree::{KdTree, PhotonRange};
use crate::integrators::photon_map::photon::{PathFlags, Photon, VolumePhoton};
use crate::integrators::photon_map::settings::{DirectLighting, GatherKernel, PhotonMapSettings};

/// A point where an eye path scatters and light is gathered.
enum ScatterVertex<'b> {
    Surface {
        si: &'b SurfaceInteraction,
        bsdf: &'b dyn Bsdf,
    },
    Medium {
        p: Point3f,
        wo: Vector3f,
        phase: &'b dyn PhaseFunction,
    },
}

impl<'b> ScatterVertex<'b> {
    fn position(&self) -> Point3f {
        match self {
            ScatterVertex::Surface { si, .. } => si.p,
            ScatterVertex::Medium { p, .. } => *p,
        }
    }
    /// Scattered fraction towards *wi* (cosine included) and the
    /// density of sampling *wi*.
    fn eval(&self, wi: &Vector3f) -> (Spectrum, Float) {
        match self {
            ScatterVertex::Surface { si, bsdf } => {
                let f: Spectrum = bsdf.f(&si.wo, wi, &si.n, TransportMode::Radiance)
                    * vec3_abs_dot_nrmf(wi, &si.n);
                (f, bsdf.pdf(&si.wo, wi, &si.n))
            }
            ScatterVertex::Medium { wo, phase, .. } => {
                let p: Float = phase.p(wo, wi);
                (Spectrum::new(p), p)
            }
        }
    }
    /// Sampled direction, its scattered fraction and its density.
    fn sample(&self, sampler: &mut dyn Sampler) -> Option<(Vector3f, Spectrum, Float)> {
        match self {
            ScatterVertex::Surface { si, bsdf } => {
                let bs = bsdf.sample_f(&si.wo, &si.n, &sampler.get_2d(), TransportMode::Radiance)?;
                if bs.is_specular() || bs.pdf <= 0.0 as Float {
                    return None;
                }
                Some((bs.wi, bs.f * vec3_abs_dot_nrmf(&bs.wi, &si.n), bs.pdf))
            }
            ScatterVertex::Medium { wo, phase, .. } => {
                let (p, wi) = phase.sample_p(wo, &sampler.get_2d());
                if p <= 0.0 as Float {
                    return None;
                }
                Some((wi, Spectrum::new(p), p))
            }
        }
    }
    fn spawn_ray(&self, d: &Vector3f) -> Ray {
        match self {
            ScatterVertex::Surface { si, .. } => si.spawn_ray(d),
            ScatterVertex::Medium { p, .. } => Ray::new(*p, *d),
        }
    }
    /// Shadow ray towards a sampled point on an emitter.
    fn spawn_shadow_ray(&self, ls: &LightSample) -> Ray {
        match self {
            ScatterVertex::Surface { si, .. } => {
                if ls.dist.is_finite() {
                    si.spawn_ray_to(&ls.p)
                } else {
                    si.spawn_ray(&ls.d)
                }
            }
            ScatterVertex::Medium { p, .. } => {
                if ls.dist.is_finite() {
                    Ray::with_t_max(*p, ls.p - *p, 1.0 as Float - RAY_EPSILON)
                } else {
                    Ray::new(*p, ls.d)
                }
            }
        }
    }
}

pub struct PhotonTracer<'a> {
    pub scene: &'a Scene,
    pub camera: &'a dyn Camera,
    pub settings: &'a PhotonMapSettings,
    pub light_distrib: &'a LightDistribution,
    surface_range: PhotonRange,
    volume_range: PhotonRange,
    volume_enabled: bool,
}

impl<'a> PhotonTracer<'a> {
    pub fn new(
        scene: &'a Scene,
        camera: &'a dyn Camera,
        settings: &'a PhotonMapSettings,
        light_distrib: &'a LightDistribution,
    ) -> Self {
        PhotonTracer {
            scene,
            camera,
            settings,
            light_distrib,
            surface_range: PhotonRange::new(settings.gather_count),
            volume_range: PhotonRange::new(settings.gather_count),
            volume_enabled: settings.volume_photon_count > 0 && scene.medium.is_some(),
        }
    }
    pub fn volume_enabled(&self) -> bool {
        self.volume_enabled
    }
    /// Walk a single photon path, appending its deposits. Returns the
    /// number of surface and volume photons added.
    pub fn trace_photon(
        &mut self,
        surface_photons: &mut Vec<Photon>,
        volume_photons: &mut Vec<VolumePhoton>,
        sampler: &mut dyn Sampler,
    ) -> (usize, usize) {
        let mut deposited: (usize, usize) = (0, 0);
        // choose a light, sample a photon leaving it
        let (light_index, light_pdf) = match self.light_distrib.sample(sampler.get_1d()) {
            Some(selected) => selected,
            None => return deposited,
        };
        let light: &Arc<dyn Primitive> = &self.scene.primitives[self.scene.lights[light_index]];
        let ls: LightSample = match light.sample_outbound_direction(sampler) {
            Some(ls) => ls,
            None => return deposited,
        };
        if ls.pdf <= 0.0 as Float || light_pdf <= 0.0 as Float || ls.weight.is_black() {
            return deposited;
        }
        let mut beta: Spectrum = ls.weight / light_pdf;
        if !beta.is_finite() {
            return deposited;
        }
        let mut ray: Ray = spawn_light_ray(&ls);
        let store_first: bool = self.settings.direct_lighting == DirectLighting::Photons;
        let mut bounce: u32 = 0;
        let mut flags: u8 = PathFlags::Specular as u8;
        loop {
            let hit: Option<SurfaceInteraction> = self.scene.intersect(&ray);
            // scattering in the medium happens before the surface is reached
            if let Some((medium, t0, t1)) = self.scene.medium_segment(&ray) {
                let segment: Ray = Ray::with_t_max(ray.position(t0), ray.d, t1 - t0);
                let ms = medium.sample(&segment, sampler);
                beta *= ms.weight();
                if beta.is_black() || !beta.is_finite() {
                    break;
                }
                if !ms.exited {
                    let p: Point3f = ray.position(t0 + ms.t);
                    if self.volume_enabled && (bounce > 0 || store_first) {
                        volume_photons.push(VolumePhoton {
                            p,
                            d: ray.d,
                            power: beta,
                            bounce,
                            flags,
                            medium: medium.clone(),
                        });
                        deposited.1 += 1;
                    }
                    if bounce >= self.settings.max_bounces {
                        break;
                    }
                    // phase function sampling is exact, beta is unchanged
                    let (phase, wi) = medium.phase().sample_p(&-ray.d, &sampler.get_2d());
                    if phase <= 0.0 as Float {
                        break;
                    }
                    bounce += 1;
                    flags &= !(PathFlags::Specular as u8);
                    flags |= PathFlags::Medium as u8;
                    ray = Ray::new(p, wi);
                    continue;
                }
            }
            let si: SurfaceInteraction = match hit {
                Some(si) => si,
                None => break,
            };
            let bsdf: Arc<dyn Bsdf> = match si.bsdf {
                Some(ref bsdf) => bsdf.clone(),
                None => break,
            };
            if !bsdf.is_specular() && (bounce > 0 || store_first) {
                let photon = Photon {
                    p: si.p,
                    d: ray.d,
                    power: beta,
                    bounce,
                    flags,
                };
                if !self.settings.caustics_only || photon.is_caustic() {
                    surface_photons.push(photon);
                    deposited.0 += 1;
                }
            }
            if bounce >= self.settings.max_bounces {
                break;
            }
            let bs = match bsdf.sample_f(&si.wo, &si.n, &sampler.get_2d(), TransportMode::Importance) {
                Some(bs) => bs,
                None => break,
            };
            if bs.pdf <= 0.0 as Float || bs.f.is_black() {
                break;
            }
            let bnew: Spectrum = beta * bs.f * (vec3_abs_dot_nrmf(&bs.wi, &si.n) / bs.pdf);
            // possibly terminate the path with Russian roulette
            let y: Float = beta.y();
            if y <= 0.0 as Float {
                break;
            }
            let q: Float = (0.0 as Float).max(1.0 as Float - bnew.y() / y);
            if sampler.get_1d() < q {
                break;
            }
            beta = bnew / (1.0 as Float - q);
            if !bs.is_specular() {
                flags &= !(PathFlags::Specular as u8);
                flags |= PathFlags::Diffuse as u8;
            }
            bounce += 1;
            ray = si.spawn_ray(&bs.wi);
        }
        deposited
    }
    /// Radiance arriving at the camera through one sample of *pixel*.
    /// The sampler has to be positioned on the pixel sample already.
    pub fn trace_sample(
        &mut self,
        pixel: &Point2i,
        surface_tree: &KdTree<Photon>,
        volume_tree: Option<&KdTree<VolumePhoton>>,
        sampler: &mut dyn Sampler,
        radius: Float,
    ) -> Spectrum {
        let next_event: bool = self.settings.direct_lighting == DirectLighting::NextEvent;
        let mut l: Spectrum = Spectrum::default();
        let mut beta: Spectrum = Spectrum::new(1.0 as Float);
        let mut ray: Ray = self.camera.generate_ray(pixel, &sampler.get_2d());
        // emission is counted unless a light sample at the previous
        // vertex accounted for it already
        let mut count_emission: bool = true;
        let mut depth: u32 = 0;
        loop {
            let hit: Option<SurfaceInteraction> = self.scene.intersect(&ray);
            if let Some((medium, t0, t1)) = self.scene.medium_segment(&ray) {
                let segment: Ray = Ray::with_t_max(ray.position(t0), ray.d, t1 - t0);
                let ms = medium.sample(&segment, sampler);
                if !ms.exited {
                    let p: Point3f = ray.position(t0 + ms.t);
                    let wo: Vector3f = -ray.d;
                    let vertex = ScatterVertex::Medium {
                        p,
                        wo,
                        phase: medium.phase(),
                    };
                    if let Some(tree) = volume_tree {
                        l += beta * ms.tr_pdf * self.gather_volume(tree, &p, &wo);
                        if next_event {
                            l += beta * ms.weight() * self.estimate_direct(&vertex, sampler);
                        }
                        break;
                    }
                    // no volume photons: light the vertex with a light
                    // sample and continue through the medium
                    beta *= ms.weight();
                    l += beta * self.estimate_direct(&vertex, sampler);
                    count_emission = false;
                    if depth >= self.settings.max_bounces {
                        break;
                    }
                    let (phase, wi) = medium.phase().sample_p(&wo, &sampler.get_2d());
                    if phase <= 0.0 as Float {
                        break;
                    }
                    depth += 1;
                    ray = Ray::new(p, wi);
                    if !self.russian_roulette(&mut beta, depth, sampler) {
                        break;
                    }
                    continue;
                }
                beta *= ms.weight();
            }
            let si: SurfaceInteraction = match hit {
                Some(si) => si,
                None => {
                    if count_emission {
                        l += beta * self.scene.escaped_radiance(&ray);
                    }
                    break;
                }
            };
            if count_emission {
                l += beta * self.scene.emission(&si);
            }
            let bsdf: Arc<dyn Bsdf> = match si.bsdf {
                Some(ref bsdf) => bsdf.clone(),
                None => break,
            };
            if !bsdf.is_specular() {
                l += beta * self.gather_surface(surface_tree, &si, bsdf.as_ref(), radius);
                if next_event {
                    let vertex = ScatterVertex::Surface {
                        si: &si,
                        bsdf: bsdf.as_ref(),
                    };
                    l += beta * self.estimate_direct(&vertex, sampler);
                }
                break;
            }
            // specular vertices continue the ray
            if depth >= self.settings.max_bounces {
                break;
            }
            let bs = match bsdf.sample_f(&si.wo, &si.n, &sampler.get_2d(), TransportMode::Radiance) {
                Some(bs) => bs,
                None => break,
            };
            if bs.pdf <= 0.0 as Float || bs.f.is_black() {
                break;
            }
            beta *= bs.f * (vec3_abs_dot_nrmf(&bs.wi, &si.n) / bs.pdf);
            count_emission = true;
            depth += 1;
            ray = si.spawn_ray(&bs.wi);
            if !self.russian_roulette(&mut beta, depth, sampler) {
                break;
            }
        }
        l
    }
    /// Returns false if the path gets terminated.
    fn russian_roulette(&self, beta: &mut Spectrum, depth: u32, sampler: &mut dyn Sampler) -> bool {
        if depth <= self.settings.rr_depth {
            return true;
        }
        let q: Float = (0.05 as Float).max(1.0 as Float - beta.max_component_value());
        if sampler.get_1d() < q {
            return false;
        }
        *beta = *beta / (1.0 as Float - q);
        true
    }
    /// Squared radius the density estimate is normalized with: the
    /// distance of the farthest photon if the query ran full.
    fn estimate_radius2(range: &PhotonRange, radius: Float) -> Float {
        if range.is_full() && range.max_dist2() > 0.0 as Float {
            range.max_dist2()
        } else {
            radius * radius
        }
    }
    /// Reflected radiance at *si* estimated from the surface photons.
    pub fn gather_surface(
        &mut self,
        tree: &KdTree<Photon>,
        si: &SurfaceInteraction,
        bsdf: &dyn Bsdf,
        radius: Float,
    ) -> Spectrum {
        if tree.nearest_neighbours(&si.p, &mut self.surface_range, radius) == 0 {
            return Spectrum::default();
        }
        let r2: Float = PhotonTracer::estimate_radius2(&self.surface_range, radius);
        let mut sum: Spectrum = Spectrum::default();
        for (index, d2) in self.surface_range.iter() {
            let photon: &Photon = tree.get(index);
            let f: Spectrum = bsdf.f(&si.wo, &-photon.d, &si.n, TransportMode::Radiance);
            if f.is_black() {
                continue;
            }
            let k: Float = match self.settings.gather_kernel {
                GatherKernel::Uniform => 1.0 as Float,
                GatherKernel::Epanechnikov => {
                    2.0 as Float * (1.0 as Float - d2 / r2).max(0.0 as Float)
                }
            };
            sum += f * photon.power * k;
        }
        sum / (PI * r2)
    }
    /// In-scattered radiance at *p* estimated from the volume photons,
    /// not yet multiplied by the transmittance towards the eye.
    pub fn gather_volume(&mut self, tree: &KdTree<VolumePhoton>, p: &Point3f, wo: &Vector3f) -> Spectrum {
        let radius: Float = self.settings.volume_gather_radius;
        if tree.nearest_neighbours(p, &mut self.volume_range, radius) == 0 {
            return Spectrum::default();
        }
        let r2: Float = PhotonTracer::estimate_radius2(&self.volume_range, radius);
        let mut sum: Spectrum = Spectrum::default();
        for (index, d2) in self.volume_range.iter() {
            let photon: &VolumePhoton = tree.get(index);
            let phase: Float = photon.medium.phase().p(wo, &-photon.d);
            let k: Float = match self.settings.gather_kernel {
                GatherKernel::Uniform => 1.0 as Float,
                // three dimensional Epanechnikov kernel
                GatherKernel::Epanechnikov => {
                    2.5 as Float * (1.0 as Float - d2 / r2).max(0.0 as Float)
                }
            };
            sum += photon.power * (phase * k);
        }
        let volume: Float = 4.0 as Float / 3.0 as Float * PI * r2 * r2.sqrt();
        sum / volume
    }
    /// Direct light from one emitter picked by power, combining a
    /// light sample and a scattering sample with the power heuristic.
    fn estimate_direct(&self, vertex: &ScatterVertex, sampler: &mut dyn Sampler) -> Spectrum {
        let (light_index, light_pdf) = match self.light_distrib.sample(sampler.get_1d()) {
            Some(selected) => selected,
            None => return Spectrum::default(),
        };
        if light_pdf <= 0.0 as Float {
            return Spectrum::default();
        }
        let prim_index: usize = self.scene.lights[light_index];
        let light: &Arc<dyn Primitive> = &self.scene.primitives[prim_index];
        let p: Point3f = vertex.position();
        let mut ld: Spectrum = Spectrum::default();
        // sample light source with multiple importance sampling
        if let Some(ls) = light.sample_inbound_direction(&p, sampler) {
            if ls.pdf > 0.0 as Float && !ls.weight.is_black() {
                let (f, scattering_pdf) = vertex.eval(&ls.d);
                if !f.is_black() {
                    let shadow: Ray = vertex.spawn_shadow_ray(&ls);
                    if !self.scene.occluded(&shadow) {
                        let tr: Spectrum = self.scene.transmittance(&shadow);
                        if light.is_delta() {
                            ld += f * ls.weight * tr;
                        } else {
                            let weight: Float = power_heuristic(1, ls.pdf, 1, scattering_pdf);
                            ld += f * ls.weight * tr * weight;
                        }
                    }
                }
            }
        }
        // sample scattered direction with multiple importance sampling
        if !light.is_delta() {
            if let Some((wi, f, scattering_pdf)) = vertex.sample(sampler) {
                let ray: Ray = vertex.spawn_ray(&wi);
                let si: Option<SurfaceInteraction> = match self.scene.intersect(&ray) {
                    Some(si) if si.primitive == Some(prim_index) => Some(si),
                    Some(_) => None,
                    None if light.is_infinite() => Some(self.scene.escaped_interaction(&ray)),
                    None => None,
                };
                if let Some(si) = si {
                    let le: Spectrum = light.emission(&si, &si.wo);
                    let pdf: Float = light.inbound_pdf(&p, &si);
                    if !le.is_black() && pdf > 0.0 as Float {
                        let tr: Spectrum = self.scene.transmittance(&ray);
                        let weight: Float = power_heuristic(1, scattering_pdf, 1, pdf);
                        ld += f * le * tr * (weight / scattering_pdf);
                    }
                }
            }
        }
        ld / light_pdf
    }
}

/// First ray of a photon path, pushed off the emitter surface.
fn spawn_light_ray(ls: &LightSample) -> Ray {
    let n: Vector3f = Vector3f::from(ls.n);
    let offset: Vector3f = if vec3_dot_vec3f(&n, &ls.d) < 0.0 as Float {
        -n * RAY_EPSILON
    } else {
        n * RAY_EPSILON
    };
    Ray::new(ls.p + offset, ls.d)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cameras::perspective::PinholeCamera;
    use crate::core::geometry::Normal3f;
    use crate::core::lightdistrib::compute_light_power_distribution;
    use crate::core::medium::Medium;
    use crate::lights::point::PointLight;
    use crate::materials::matte::MatteBsdf;
    use crate::materials::mirror::MirrorBsdf;
    use crate::media::homogeneous::HomogeneousMedium;
    use crate::samplers::random::RandomSampler;
    use crate::shapes::quad::Quad;

    fn floor(bsdf: Arc<dyn Bsdf>) -> Arc<dyn Primitive> {
        Arc::new(Quad::new(
            Point3f::new(-5.0, 0.0, -5.0),
            Vector3f::new(0.0, 0.0, 10.0),
            Vector3f::new(10.0, 0.0, 0.0),
            Some(bsdf),
            None,
        ))
    }

    fn camera() -> PinholeCamera {
        PinholeCamera::new(
            Point3f::new(0.0, 2.0, -2.0),
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            30.0,
            Point2i { x: 8, y: 8 },
        )
    }

    #[test]
    fn photons_land_on_diffuse_surfaces_only() {
        let scene = Scene::new(
            vec![
                floor(Arc::new(MatteBsdf::new(Spectrum::new(0.5)))),
                Arc::new(PointLight::new(Point3f::new(0.0, 1.0, 0.0), Spectrum::new(10.0))),
            ],
            None,
        );
        let distrib = compute_light_power_distribution(&scene).unwrap();
        let settings = PhotonMapSettings::default();
        let camera = camera();
        let mut tracer = PhotonTracer::new(&scene, &camera, &settings, &distrib);
        let mut sampler = RandomSampler::new(1, 7);
        let mut surface = Vec::new();
        let mut volume = Vec::new();
        let mut total = 0;
        for _ in 0..100 {
            let (s, v) = tracer.trace_photon(&mut surface, &mut volume, &mut sampler);
            assert_eq!(v, 0);
            total += s;
        }
        assert_eq!(total, surface.len());
        // about half of the photons leave downwards
        assert!(surface.len() > 20 && surface.len() < 80);
        for photon in &surface {
            assert!(photon.p.y.abs() < 1e-3);
            assert!(photon.power.c.iter().all(|c| *c >= 0.0));
        }
        assert!(surface.iter().any(|photon| photon.bounce == 0));
    }

    #[test]
    fn next_event_skips_first_deposit() {
        let scene = Scene::new(
            vec![
                floor(Arc::new(MatteBsdf::new(Spectrum::new(0.5)))),
                Arc::new(PointLight::new(Point3f::new(0.0, 1.0, 0.0), Spectrum::new(10.0))),
            ],
            None,
        );
        let distrib = compute_light_power_distribution(&scene).unwrap();
        let settings = PhotonMapSettings {
            direct_lighting: DirectLighting::NextEvent,
            ..Default::default()
        };
        let camera = camera();
        let mut tracer = PhotonTracer::new(&scene, &camera, &settings, &distrib);
        let mut sampler = RandomSampler::new(1, 7);
        let mut surface = Vec::new();
        let mut volume = Vec::new();
        for _ in 0..200 {
            tracer.trace_photon(&mut surface, &mut volume, &mut sampler);
        }
        // a single open plane cannot be hit twice
        assert!(surface.is_empty());
    }

    #[test]
    fn mirror_floor_stores_nothing() {
        let scene = Scene::new(
            vec![
                floor(Arc::new(MirrorBsdf::new(Spectrum::new(1.0)))),
                Arc::new(PointLight::new(Point3f::new(0.0, 1.0, 0.0), Spectrum::new(10.0))),
            ],
            None,
        );
        let distrib = compute_light_power_distribution(&scene).unwrap();
        let settings = PhotonMapSettings::default();
        let camera = camera();
        let mut tracer = PhotonTracer::new(&scene, &camera, &settings, &distrib);
        let mut sampler = RandomSampler::new(1, 3);
        let mut surface = Vec::new();
        let mut volume = Vec::new();
        for _ in 0..100 {
            assert_eq!(tracer.trace_photon(&mut surface, &mut volume, &mut sampler), (0, 0));
        }
        let tree = KdTree::new(surface);
        let mut sampler = RandomSampler::new(1, 3);
        sampler.start_pixel_sample(Point2i { x: 4, y: 4 }, 0);
        let l = tracer.trace_sample(&Point2i { x: 4, y: 4 }, &tree, None, &mut sampler, 0.1);
        assert!(l.is_black());
    }

    #[test]
    fn uniform_gather_of_a_single_photon() {
        let scene = Scene::new(
            vec![
                floor(Arc::new(MatteBsdf::new(Spectrum::new(0.5)))),
                Arc::new(PointLight::new(Point3f::new(0.0, 1.0, 0.0), Spectrum::new(10.0))),
            ],
            None,
        );
        let distrib = compute_light_power_distribution(&scene).unwrap();
        let settings = PhotonMapSettings::default();
        let camera = camera();
        let mut tracer = PhotonTracer::new(&scene, &camera, &settings, &distrib);
        let tree = KdTree::new(vec![Photon {
            p: Point3f::new(0.0, 0.0, 0.0),
            d: Vector3f::new(0.0, -1.0, 0.0),
            power: Spectrum::new(2.0),
            bounce: 0,
            flags: 0,
        }]);
        let si = SurfaceInteraction::new(
            Point3f::new(0.01, 0.0, 0.0),
            Normal3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            1.0,
        );
        let bsdf = MatteBsdf::new(Spectrum::new(0.5));
        let l = tracer.gather_surface(&tree, &si, &bsdf, 0.1);
        // f = 0.5 / pi, one photon of power 2 over pi r^2
        let expected: Float = 0.5 / PI * 2.0 / (PI * 0.01);
        assert!((l[0] - expected).abs() < 1e-3 * expected);
        let outside = SurfaceInteraction::new(
            Point3f::new(0.5, 0.0, 0.0),
            Normal3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            1.0,
        );
        assert!(tracer.gather_surface(&tree, &outside, &bsdf, 0.1).is_black());
    }

    fn lit_floor() -> Scene {
        Scene::new(
            vec![
                floor(Arc::new(MatteBsdf::new(Spectrum::new(0.5)))),
                Arc::new(PointLight::new(Point3f::new(0.0, 1.0, 0.0), Spectrum::new(10.0))),
            ],
            None,
        )
    }

    fn photon_at(x: Float) -> Photon {
        Photon {
            p: Point3f::new(x, 0.0, 0.0),
            d: Vector3f::new(0.0, -1.0, 0.0),
            power: Spectrum::new(1.0),
            bounce: 0,
            flags: 0,
        }
    }

    fn gather_at_origin(settings: &PhotonMapSettings, tree: &KdTree<Photon>, radius: Float) -> Float {
        let scene = lit_floor();
        let distrib = compute_light_power_distribution(&scene).unwrap();
        let camera = camera();
        let mut tracer = PhotonTracer::new(&scene, &camera, settings, &distrib);
        let si = SurfaceInteraction::new(
            Point3f::new(0.0, 0.0, 0.0),
            Normal3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            1.0,
        );
        tracer.gather_surface(tree, &si, &MatteBsdf::new(Spectrum::new(0.5)), radius)[0]
    }

    #[test]
    fn full_query_shrinks_the_radius() {
        let tree = KdTree::new(vec![photon_at(0.01), photon_at(0.02), photon_at(0.05)]);
        let f: Float = 0.5 / PI;
        // room for every photon: the fixed radius normalizes
        let roomy = PhotonMapSettings {
            gather_count: 10,
            ..Default::default()
        };
        let l = gather_at_origin(&roomy, &tree, 0.1);
        let expected: Float = 3.0 * f / (PI * 0.01);
        assert!((l - expected).abs() < 1e-3 * expected, "{} vs {}", l, expected);
        // two photons fit: the farther one of them sets the radius
        let full = PhotonMapSettings {
            gather_count: 2,
            ..Default::default()
        };
        let l = gather_at_origin(&full, &tree, 0.1);
        let expected: Float = 2.0 * f / (PI * 0.0004);
        assert!((l - expected).abs() < 1e-3 * expected, "{} vs {}", l, expected);
    }

    #[test]
    fn epanechnikov_weights_fall_off_with_distance() {
        let single = KdTree::new(vec![photon_at(0.01)]);
        let smooth = PhotonMapSettings {
            gather_kernel: GatherKernel::Epanechnikov,
            ..Default::default()
        };
        let l = gather_at_origin(&smooth, &single, 0.1);
        // weight 2 (1 - 0.0001 / 0.01)
        let expected: Float = 1.98 * 0.5 / PI / (PI * 0.01);
        assert!((l - expected).abs() < 1e-3 * expected, "{} vs {}", l, expected);
        // the photon defining the shrunk radius gets no weight
        let tree = KdTree::new(vec![photon_at(0.01), photon_at(0.02), photon_at(0.05)]);
        let full = PhotonMapSettings {
            gather_count: 2,
            ..smooth
        };
        let l = gather_at_origin(&full, &tree, 0.1);
        let expected: Float = 1.5 * 0.5 / PI / (PI * 0.0004);
        assert!((l - expected).abs() < 1e-3 * expected, "{} vs {}", l, expected);
    }

    #[test]
    fn volume_gather_divides_by_the_sphere_volume() {
        let scene = lit_floor();
        let distrib = compute_light_power_distribution(&scene).unwrap();
        let settings = PhotonMapSettings {
            volume_gather_radius: 0.2,
            ..Default::default()
        };
        let camera = camera();
        let mut tracer = PhotonTracer::new(&scene, &camera, &settings, &distrib);
        let medium: Arc<dyn Medium> = Arc::new(HomogeneousMedium::new(
            &Spectrum::new(0.1),
            &Spectrum::new(0.5),
            0.0,
        ));
        let tree = KdTree::new(vec![VolumePhoton {
            p: Point3f::new(0.0, 0.5, 0.05),
            d: Vector3f::new(0.0, -1.0, 0.0),
            power: Spectrum::new(3.0),
            bounce: 1,
            flags: PathFlags::Medium as u8,
            medium,
        }]);
        let l = tracer.gather_volume(&tree, &Point3f::new(0.0, 0.5, 0.0), &Vector3f::new(1.0, 0.0, 0.0));
        // isotropic phase function 1 / 4 pi
        let expected: Float = 3.0 / (4.0 * PI) / (4.0 / 3.0 * PI * 0.008);
        assert!((l[2] - expected).abs() < 1e-3 * expected, "{} vs {}", l[2], expected);
    }

    #[test]
    fn caustics_only_keeps_specular_then_diffuse_photons() {
        // mirror ceiling above a point light over a matte floor
        let ceiling: Arc<dyn Primitive> = Arc::new(Quad::new(
            Point3f::new(-5.0, 1.0, -5.0),
            Vector3f::new(10.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 10.0),
            Some(Arc::new(MirrorBsdf::new(Spectrum::new(1.0)))),
            None,
        ));
        let scene = Scene::new(
            vec![
                floor(Arc::new(MatteBsdf::new(Spectrum::new(0.8)))),
                ceiling,
                Arc::new(PointLight::new(Point3f::new(0.0, 0.5, 0.0), Spectrum::new(10.0))),
            ],
            None,
        );
        let distrib = compute_light_power_distribution(&scene).unwrap();
        let camera = camera();
        let trace = |settings: &PhotonMapSettings| -> Vec<Photon> {
            let mut tracer = PhotonTracer::new(&scene, &camera, settings, &distrib);
            let mut sampler = RandomSampler::new(1, 11);
            let mut surface = Vec::new();
            let mut volume = Vec::new();
            for _ in 0..500 {
                tracer.trace_photon(&mut surface, &mut volume, &mut sampler);
            }
            surface
        };
        let next_event = PhotonMapSettings {
            direct_lighting: DirectLighting::NextEvent,
            ..Default::default()
        };
        let all = trace(&next_event);
        assert!(all.iter().any(|photon| !photon.is_caustic()));
        let caustics = trace(&PhotonMapSettings {
            caustics_only: true,
            ..next_event
        });
        // a third of the paths reach the floor over the mirror
        assert!(caustics.len() > 100, "{} caustic photons", caustics.len());
        for photon in &caustics {
            assert!(photon.is_caustic());
            assert_eq!(photon.bounce, 1);
            assert!(photon.p.y.abs() < 1e-3);
        }
    }
}
