// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prompt construction for the image-generation service.
//!
//! `build_prompt` is a pure function: the same mode, settings and
//! transcript always produce byte-identical instruction text. Together with
//! a pinned seed and low temperature this keeps repeated generations
//! reproducible. Each mode's template is its own function so the fixed
//! instructional text stays auditable as data.

use crate::settings::{DesignSettings, ViewMode};

/// Which instruction set to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Colorize a 2D plan in place, geometry and labels untouched.
    PlanColorize,
    /// Re-texture an existing render, locking geometry and camera.
    Refine,
    /// Build a fresh 3D render from the original drawing set.
    InitialConstruct { multi_image: bool },
}

impl PromptMode {
    /// Derive the mode from the request shape: 2D plan mode wins, then
    /// refinement, otherwise initial construction.
    pub fn for_request(view_mode: ViewMode, refinement: bool, image_count: usize) -> Self {
        if view_mode == ViewMode::TwoDPlan {
            PromptMode::PlanColorize
        } else if refinement {
            PromptMode::Refine
        } else {
            PromptMode::InitialConstruct {
                multi_image: image_count > 1,
            }
        }
    }
}

/// Assemble the full instruction text for one generation request.
///
/// The transcript (extracted drawing text) is only consulted in initial
/// construction, where annotated cabinet codes matter; refinement and plan
/// colorization work from the supplied image alone.
pub fn build_prompt(mode: PromptMode, settings: &DesignSettings, transcript: Option<&str>) -> String {
    match mode {
        PromptMode::PlanColorize => plan_colorize(settings),
        PromptMode::Refine => refine(settings),
        PromptMode::InitialConstruct { multi_image } => {
            initial_construct(settings, multi_image, transcript)
        }
    }
}

/// Material-consistency rules shared by the 3D modes.
fn material_rules(settings: &DesignSettings) -> String {
    format!(
        "[MATERIAL CONSISTENCY RULES]\n\
         1. WALL CABINETS: all upper/wall cabinets must be \"{wall}\".\n\
         2. BASE & ISLAND CABINETS: all base cabinets AND the island must be \
         \"{base}\" unless the drawing has a text label explicitly naming a \
         different color for the island.\n\
         - Do NOT make the island a random accent color.\n\
         3. COUNTERTOPS: all surfaces must be \"{countertop}\".\n\
         4. DOOR STYLE: {door}.\n\
         5. WALLS: {walls}.",
        wall = settings.wall_cabinet_color.prompt_phrase(),
        base = settings.base_cabinet_color.prompt_phrase(),
        countertop = settings.countertop.prompt_phrase(),
        door = settings.door_style.prompt_phrase(),
        walls = settings.wall_color.prompt_phrase(),
    )
}

/// Standard architectural cabinet codes, so annotated drawings are read the
/// way a kitchen designer reads them.
fn nomenclature_glossary() -> &'static str {
    "[CABINET CODE GLOSSARY]\n\
     Interpret text codes on the drawing using standard kitchen nomenclature:\n\
     - B## = Base cabinet (## = width in inches, e.g. B30 = 30\" base cabinet)\n\
     - SB## = Sink base cabinet\n\
     - DB## = Drawer base cabinet (stack of drawers, no door)\n\
     - W####  = Wall cabinet (width x height, e.g. W3030)\n\
     - MW = Microwave cabinet or microwave opening\n\
     - OV = Oven cabinet\n\
     - REF = Refrigerator space\n\
     - DW = Dishwasher space\n\
     - F## = Filler panel"
}

/// Hard prohibitions that apply to every 3D construction request.
fn negative_constraints() -> &'static str {
    "[FORBIDDEN OUTPUT]\n\
     - NO split-screen, collage or multi-viewport output. Render exactly ONE view.\n\
     - NO visible blueprint/wireframe lines in the final image.\n\
     - NO text overlays, labels, dimensions or watermarks.\n\
     - NO decorations that are not drawn (no fruit, no plants, no vases). \
     Render the kitchen EMPTY.\n\
     - NO added appliances, windows or furniture that are not in the source drawing."
}

/// Mode: colorize a 2D architectural plan without touching its geometry.
fn plan_colorize(settings: &DesignSettings) -> String {
    format!(
        "You are an architectural drafting assistant.\n\
         TASK: Colorize this 2D floor plan layout.\n\n\
         [STRICT ADHERENCE]\n\
         1. KEEP ALL ORIGINAL TEXT LABELS (cabinet codes like B30, W3030). Do not obscure them.\n\
         2. FILL COLORS inside the existing lines only.\n\
         3. Wall cabinet fill: {wall}.\n\
         4. Base cabinet and island fill: {base}.\n\
         5. Flooring: subtle grid or wood texture.\n\
         6. Do not change the geometry.\n\n\
         Output: a high-quality colored architectural plan.",
        wall = settings.wall_cabinet_color.prompt_phrase(),
        base = settings.base_cabinet_color.prompt_phrase(),
    )
}

/// Mode: swap materials on an existing render while locking geometry.
fn refine(settings: &DesignSettings) -> String {
    format!(
        "TASK: Retexture this 3D render.\n\n\
         [GEOMETRY LOCK]\n\
         - DO NOT CHANGE THE LAYOUT.\n\
         - DO NOT ADD OR REMOVE CABINETS.\n\
         - KEEP THE EXACT CAMERA ANGLE.\n\n\
         [UPDATES]\n\
         - Change wall cabinet color to: {wall}.\n\
         - Change base and island cabinet color to: {base}.\n\
         - Change wall paint to: {walls}.\n\
         - Change countertop to: {countertop}.\n\n\
         {rules}\n\n\
         Output: a photorealistic image with geometry identical to the input.",
        wall = settings.wall_cabinet_color.prompt_phrase(),
        base = settings.base_cabinet_color.prompt_phrase(),
        walls = settings.wall_color.prompt_phrase(),
        countertop = settings.countertop.prompt_phrase(),
        rules = material_rules(settings),
    )
}

/// Mode: full 3D construction from the selected drawing pages.
fn initial_construct(
    settings: &DesignSettings,
    multi_image: bool,
    transcript: Option<&str>,
) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str(
        "You are an expert architectural visualization engine.\n\
         TASK: Generate a high-quality 3D render of the kitchen shown in the input images.\n\n",
    );

    if multi_image {
        prompt.push_str(
            "[INPUT ANALYSIS & HIERARCHY]\n\
             You have been provided with multiple input images.\n\n\
             CRITICAL RULE: the LAST image in the list is the MASTER VIEW.\n\
             - Generate the final render from the EXACT SAME CAMERA ANGLE as the last image.\n\
             - If the last image is a 3D line drawing or sketch: paint over it. Do not change \
             the perspective, do not move lines; replace sketch lines with photorealistic textures.\n\
             - If the last image is a 2D elevation (front view of cabinets): render it as a \
             photorealistic elevation. Keep it flat and straight-on; do not turn it into a \
             perspective view.\n\
             - If the last image is a floor plan: extrude it into 3D from a standard eye-level \
             perspective.\n\
             - All OTHER images are reference only (dimensions, cabinet configurations).\n\n\
             [MULTI-VIEW CONSISTENCY]\n\
             When a detail view (close-up of an island, a cabinet run, a hood) accompanies the \
             master view:\n\
             - Merge the specific configuration from the detail view into the master view.\n\
             - Example: if the master view shows a generic island but the detail view shows an \
             island with a microwave drawer and 3 drawers, render the island with exactly that \
             microwave and drawer configuration.\n\
             - Trust the detail view for furniture configuration; never let it override the \
             master view's camera framing.\n\n",
        );
    } else {
        prompt.push_str(
            "[INPUT ANALYSIS]\n\
             You have been provided with a single input image.\n\
             - If it is a multi-viewport technical sheet (several drawings on one page), first \
             isolate the single best full-kitchen perspective sub-view and work from that alone. \
             Prefer the widest 3D perspective over partial details or 2D plans.\n\
             - Generate the final render from that view's exact camera angle.\n\n",
        );
    }

    prompt.push_str(
        "[TRANSFORMATION LOGIC]\n\
         You are not a creative artist; you are a texture-mapping engine.\n\
         1. Take the master drawing.\n\
         2. Keep EVERY SINGLE LINE exactly where it is.\n\
         3. Fill the areas between lines with photorealistic textures.\n\n\
         [GEOMETRY FIDELITY]\n\
         - The number of doors, drawers and panels in the output must EXACTLY match the drawing. \
         If the drawing shows 3 drawers, render 3 drawers.\n\
         - If the drawing shows a microwave opening, render a microwave opening in that exact spot.\n\
         - Do NOT straighten perspective. Do NOT \"fix\" the drawing.\n\
         - Do NOT add handles if none are drawn.\n\
         - When a text annotation and the drawn geometry disagree on a count, THE DRAWN GEOMETRY \
         WINS.\n\
         - If the render does not match the drawing line-for-line, you have failed.\n\n",
    );

    prompt.push_str(nomenclature_glossary());
    prompt.push_str("\n\n");

    prompt.push_str("[STRICT MATERIAL SPECS]\n");
    prompt.push_str(&material_rules(settings));
    prompt.push_str(
        "\n6. FLOOR: hardwood or tile, photorealistic texture.\n\
         7. Countertops must read as real stone/quartz with reflections.\n\n",
    );

    prompt.push_str(negative_constraints());
    prompt.push_str("\n\n");

    if let Some(text) = transcript {
        prompt.push_str(
            "[DRAWING TEXT CONTEXT]\n\
             The following text was extracted from the drawing set. Use it to resolve cabinet \
             codes and notes; where it contradicts the drawn geometry, the geometry wins.\n",
        );
        prompt.push_str(text);
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "[COMMON MISTAKES TO AVOID]\n\
         - Do NOT return a colored sketch. The output must read as a photograph.\n\
         - Do NOT leave black wireframe lines visible.\n\
         - Do NOT change the camera angle.\n\n\
         Output: a single photorealistic 3D render matching the master drawing's geometry exactly.",
    );

    prompt
}
